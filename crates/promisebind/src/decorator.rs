#![forbid(unsafe_code)]

//! Method wrapping: every call's future is bound to a container on the host.
//!
//! ```ignore
//! let get_user = bind_promise_to(|s: &UserStore| s.user.clone())
//!     .bind(|s: &UserStore, id: u64| s.api.fetch_user(id));
//!
//! let pending = get_user.call(&store, 12); // store.user is now pending
//! let user = pending.await?;               // store.user is fulfilled
//! ```
//!
//! [`PropertyBinder::decorate`] is the checked form: it receives the
//! `(target, name, descriptor)` triple a decorator is applied with and fails
//! with [`BindError::Usage`] for any other call shape.

use std::future::Future;

use tracing::{debug, trace};

use crate::config::BindConfig;
use crate::container::ContainerKey;
use crate::error::BindError;
use crate::settle::{Identity, settle};
use crate::usage::{DecoratorArg, MethodDescriptor, looks_like_decorator_call};

const BINDER: &str = "bind_promise_to";

/// Start binding methods to the container `key` resolves on their host.
pub fn bind_promise_to<K>(key: K) -> PropertyBinder<K> {
    PropertyBinder {
        key,
        config: BindConfig::default(),
    }
}

/// Decorator produced by [`bind_promise_to`].
#[derive(Debug, Clone)]
pub struct PropertyBinder<K> {
    key: K,
    config: BindConfig,
}

impl<K: Clone> PropertyBinder<K> {
    #[must_use]
    pub fn with_config(mut self, config: BindConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply as a decorator to `(target, method name, descriptor)`.
    ///
    /// On success the returned descriptor's `value` is the wrapped method.
    /// The target's container is touched once here so its `data` field has
    /// passed through the reactive layer before the first call.
    pub fn decorate<H, M, D>(
        &self,
        args: Vec<DecoratorArg<'_, H, M>>,
    ) -> Result<MethodDescriptor<BoundMethod<K, M>>, BindError>
    where
        H: ?Sized,
        K: ContainerKey<H, D>,
        D: Clone + PartialEq + 'static,
    {
        let arity = args.len();
        if !looks_like_decorator_call(&args) {
            return Err(BindError::Usage {
                binder: BINDER,
                arity,
            });
        }
        let Ok(
            [
                DecoratorArg::Target(target),
                DecoratorArg::Name(name),
                DecoratorArg::Descriptor(MethodDescriptor {
                    value: Some(method),
                }),
            ],
        ) = <[_; 3]>::try_from(args)
        else {
            // Shape matched but the first argument is not a target.
            return Err(BindError::Usage {
                binder: BINDER,
                arity,
            });
        };

        self.key.resolve(target).touch();
        debug!(method = name, "promise binder applied");

        Ok(MethodDescriptor::new(BoundMethod {
            key: self.key.clone(),
            method,
            name: Some(name.to_string()),
            config: self.config.clone(),
        }))
    }

    /// Wrap `method` directly, without the decorator call shape.
    pub fn bind<M>(&self, method: M) -> BoundMethod<K, M> {
        BoundMethod {
            key: self.key.clone(),
            method,
            name: None,
            config: self.config.clone(),
        }
    }
}

/// A method whose returned future drives a container's promise state.
#[derive(Debug, Clone)]
pub struct BoundMethod<K, M> {
    key: K,
    method: M,
    name: Option<String>,
    config: BindConfig,
}

impl<K, M> BoundMethod<K, M> {
    /// Method name recorded by [`PropertyBinder::decorate`].
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invoke the wrapped method on `host` and bind its future.
    ///
    /// The method runs and the host's container turns pending before this
    /// returns. The returned future yields the method's own outcome.
    pub fn call<'h, H, A, Fut, T, E>(
        &self,
        host: &'h H,
        args: A,
    ) -> impl Future<Output = Result<T, E>> + use<K, M, H, A, Fut, T, E>
    where
        H: ?Sized,
        M: Fn(&'h H, A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        K: ContainerKey<H, T>,
        T: Clone + PartialEq + 'static,
    {
        let future = (self.method)(host, args);
        trace!(method = self.name(), "bound method called");
        settle(future, self.key.resolve(host), Identity, self.config.clone())
    }
}
