#![forbid(unsafe_code)]

//! Settlement states of a bound future.

use std::fmt;
use std::str::FromStr;

/// Lifecycle state written to a container's `promise_state` field.
///
/// A binding always starts at [`Pending`](Self::Pending) and moves exactly
/// once to [`Fulfilled`](Self::Fulfilled) or [`Rejected`](Self::Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PromiseState {
    Pending,
    Fulfilled,
    Rejected,
}

impl PromiseState {
    pub const FULFILLED: &'static str = "fulfilled";
    pub const PENDING: &'static str = "pending";
    pub const REJECTED: &'static str = "rejected";

    /// All states, in transition order.
    pub const ALL: [PromiseState; 3] = [Self::Pending, Self::Fulfilled, Self::Rejected];

    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => Self::PENDING,
            Self::Fulfilled => Self::FULFILLED,
            Self::Rejected => Self::REJECTED,
        }
    }

    /// Whether the binding has settled (no further transition follows).
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for PromiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromiseState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(Self::Pending),
            Self::FULFILLED => Ok(Self::Fulfilled),
            Self::REJECTED => Ok(Self::Rejected),
            other => Err(ParseStateError(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown state string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStateError(pub String);

impl fmt::Display for ParseStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown promise state {:?} (expected pending, fulfilled or rejected)",
            self.0
        )
    }
}

impl std::error::Error for ParseStateError {}
