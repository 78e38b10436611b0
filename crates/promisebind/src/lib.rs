#![forbid(unsafe_code)]

//! Tie a future's lifecycle to observable state.
//!
//! # Role
//! `promisebind` records the settlement of a `Future<Output = Result<T, E>>`
//! on a [`PromiseBox`]: an observable `{ promise_state, data }` pair from
//! [`promisebind_reactive`]. Views subscribe to the box and re-render as the
//! operation goes `pending` → `fulfilled` / `rejected`.
//!
//! # Entry points
//! - [`bind_promise`]: fluent, `bind_promise(fut).to(&container)`, with an
//!   optional `(value, previous) -> data` transform via `to_with`.
//! - [`bind_promise_to`]: method wrapping. `bind` wraps a method directly;
//!   `decorate` takes the `(target, name, descriptor)` decorator triple and
//!   rejects any other call shape with [`BindError::Usage`].
//! - [`handle_settlement`]: the shared handler both build on.
//!
//! # Guarantees
//! - Pending is written before the binder returns, so it is always observed
//!   before the terminal state.
//! - Every write goes through [`promisebind_reactive::action`].
//! - The bound future's outcome is returned unchanged; errors are recorded as
//!   `Rejected`, never swallowed.
//! - Overlapping bindings on one container are last-settled-wins unless
//!   [`StalePolicy::LatestBinding`] is configured.
//!
//! # Threading
//! Everything here is single-threaded (`Rc`-based, `!Send`); drive bound
//! futures on a local executor.

pub mod config;
pub mod container;
pub mod decorator;
pub mod error;
pub mod fluent;
pub mod settle;
pub mod state;
pub mod usage;

pub use config::{BindConfig, STALE_POLICY_ENV, StalePolicy};
pub use container::{ContainerKey, PromiseBox, SelfKey};
pub use decorator::{BoundMethod, PropertyBinder, bind_promise_to};
pub use error::BindError;
pub use fluent::{PromiseBinding, bind_promise};
pub use settle::{Identity, Transform, handle_settlement};
pub use state::{ParseStateError, PromiseState};
pub use usage::{DecoratorArg, MethodDescriptor, looks_like_decorator_call};
