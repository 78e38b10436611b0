#![forbid(unsafe_code)]

//! Binder errors.
//!
//! Failures of the bound future itself are not represented here: they are
//! recorded as [`PromiseState::Rejected`](crate::PromiseState::Rejected) and
//! handed back to the caller unchanged.

use std::fmt;

/// Errors raised by the binder itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A decorator was applied without the `(target, name, descriptor)`
    /// call shape.
    Usage {
        /// Name of the decorator factory that was misused.
        binder: &'static str,
        /// Number of arguments actually supplied.
        arity: usize,
    },
    /// An environment override held an unrecognized value.
    Config { key: &'static str, value: String },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage { binder, arity } => write!(
                f,
                "`{binder}` is supposed to be used as a decorator. \
                 You don't seem to be using it as such (got {arity} argument(s))."
            ),
            Self::Config { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
        }
    }
}

impl std::error::Error for BindError {}
