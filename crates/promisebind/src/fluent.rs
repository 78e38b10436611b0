#![forbid(unsafe_code)]

//! `bind_promise(future).to(container)`.

use std::future::Future;

use crate::config::BindConfig;
use crate::container::PromiseBox;
use crate::settle::{Identity, settle};

/// Wrap `future` so it can be attached to a container with
/// [`to`](PromiseBinding::to) or [`to_with`](PromiseBinding::to_with).
pub fn bind_promise<Fut>(future: Fut) -> PromiseBinding<Fut> {
    PromiseBinding {
        future,
        config: BindConfig::default(),
    }
}

/// A future waiting to be attached to a container.
#[must_use = "nothing is bound until `to` or `to_with` is called"]
#[derive(Debug)]
pub struct PromiseBinding<Fut> {
    future: Fut,
    config: BindConfig,
}

impl<Fut> PromiseBinding<Fut> {
    pub fn with_config(mut self, config: BindConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind to `container`, storing the fulfilment value as its `data`.
    pub fn to<T, E>(
        self,
        container: &PromiseBox<T>,
    ) -> impl Future<Output = Result<T, E>> + use<Fut, T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        T: Clone + PartialEq + 'static,
    {
        settle(self.future, container.clone(), Identity, self.config)
    }

    /// Bind to `container`, storing `transform(value, previous_data)`.
    pub fn to_with<T, E, D, F>(
        self,
        container: &PromiseBox<D>,
        transform: F,
    ) -> impl Future<Output = Result<T, E>> + use<Fut, T, E, D, F>
    where
        Fut: Future<Output = Result<T, E>>,
        T: Clone,
        D: Clone + PartialEq + 'static,
        F: FnOnce(T, Option<D>) -> D,
    {
        settle(self.future, container.clone(), transform, self.config)
    }
}
