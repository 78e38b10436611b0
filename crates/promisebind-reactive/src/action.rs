#![forbid(unsafe_code)]

//! Named, batched mutations.

use tracing::debug_span;

use crate::batch::BatchScope;

/// Run `f` as a single tracked mutation.
///
/// Every observable written inside `f` notifies its subscribers once, after
/// `f` returns (or after the enclosing action, when nested). The `name` is
/// recorded on a `debug` span so mutations can be attributed in logs.
pub fn action<R>(name: &str, f: impl FnOnce() -> R) -> R {
    let _span = debug_span!("action", name).entered();
    let _batch = BatchScope::new();
    f()
}
