#![forbid(unsafe_code)]

//! The settlement handler shared by both binders.
//!
//! # State machine
//!
//! ```text
//!            bind                Ok(v)
//!   (any) ─────────▶ Pending ─────────────▶ Fulfilled   data = transform(v, prev)
//!                       │
//!                       │ Err(e)
//!                       ▼
//!                    Rejected                data untouched
//! ```
//!
//! Pending is written before [`handle_settlement`] returns, so it is visible
//! strictly before either terminal state. Every write happens inside a
//! [`promisebind_reactive::action`], one action per transition.

use std::future::Future;

use promisebind_reactive::action;
use tracing::{debug, trace};

use crate::config::{BindConfig, StalePolicy};
use crate::container::{ContainerKey, PromiseBox};
use crate::state::PromiseState;

/// Combines a fulfilment value with the previously stored data.
pub trait Transform<T, D> {
    fn apply(self, value: T, previous: Option<D>) -> D;
}

/// Store the fulfilment value as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T> Transform<T, T> for Identity {
    fn apply(self, value: T, _previous: Option<T>) -> T {
        value
    }
}

impl<T, D, F> Transform<T, D> for F
where
    F: FnOnce(T, Option<D>) -> D,
{
    fn apply(self, value: T, previous: Option<D>) -> D {
        self(value, previous)
    }
}

/// Bind `future`'s settlement to the container `key` resolves on `target`.
///
/// The container's `promise_state` is set to [`PromiseState::Pending`]
/// immediately. The returned future resolves to exactly what `future`
/// resolved to, after recording it:
///
/// - `Ok(v)`: state becomes `Fulfilled` and `data` becomes
///   `transform.apply(v, previous_data)` (pass [`Identity`] to store `v`).
/// - `Err(e)`: state becomes `Rejected`; `data` is left alone and `e` is
///   returned unchanged.
///
/// Dropping the returned future before it completes leaves the container
/// pending.
pub fn handle_settlement<H, K, X, Fut, T, E, D>(
    future: Fut,
    target: &H,
    key: K,
    transform: X,
    config: &BindConfig,
) -> impl Future<Output = Result<T, E>> + use<H, K, X, Fut, T, E, D>
where
    H: ?Sized,
    K: ContainerKey<H, D>,
    X: Transform<T, D>,
    Fut: Future<Output = Result<T, E>>,
    T: Clone,
    D: Clone + PartialEq + 'static,
{
    let container = key.resolve(target);
    settle(future, container, transform, config.clone())
}

/// [`handle_settlement`] for an already-resolved container.
pub(crate) fn settle<X, Fut, T, E, D>(
    future: Fut,
    container: PromiseBox<D>,
    transform: X,
    config: BindConfig,
) -> impl Future<Output = Result<T, E>>
where
    X: Transform<T, D>,
    Fut: Future<Output = Result<T, E>>,
    T: Clone,
    D: Clone + PartialEq + 'static,
{
    let generation = container.begin_binding();
    action(&config.pending_action, || {
        container.set_state(PromiseState::Pending);
        debug!(generation, "promise pending");
    });

    async move {
        let outcome = future.await;
        if !may_write(&container, generation, config.stale_policy) {
            trace!(
                generation,
                latest = container.generation(),
                ok = outcome.is_ok(),
                "stale settlement skipped"
            );
            return outcome;
        }
        match outcome {
            Ok(value) => {
                action(&config.fulfill_action, || {
                    container.set_state(PromiseState::Fulfilled);
                    let previous = container.data();
                    container.set_data(transform.apply(value.clone(), previous));
                    debug!(generation, "promise fulfilled");
                });
                Ok(value)
            }
            Err(err) => {
                action(&config.reject_action, || {
                    container.set_state(PromiseState::Rejected);
                    debug!(generation, "promise rejected");
                });
                Err(err)
            }
        }
    }
}

fn may_write<D: Clone + PartialEq + 'static>(
    container: &PromiseBox<D>,
    generation: u64,
    policy: StalePolicy,
) -> bool {
    match policy {
        StalePolicy::LastSettled => true,
        StalePolicy::LatestBinding => container.generation() == generation,
    }
}
