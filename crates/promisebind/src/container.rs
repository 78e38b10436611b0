#![forbid(unsafe_code)]

//! Observable status containers and how binders find them.
//!
//! A [`PromiseBox`] is the `{ promise_state, data }` pair a binding writes
//! to. Both fields are [`Observable`]s, so a box is registered with the
//! reactive layer from the moment it is constructed; there is no separate
//! "make observable" step before the first binding.
//!
//! [`ContainerKey`] decouples *where* the box lives from the binder:
//! [`SelfKey`] means the target is the box, and any
//! `Fn(&H) -> PromiseBox<D>` selects a field of a host `H`.

use std::cell::Cell;
use std::rc::Rc;

use promisebind_reactive::{Observable, Subscription, action};
use tracing::trace;

use crate::state::PromiseState;

/// Observable `{ promise_state, data }` pair.
///
/// `None` in either field means the field has never been written.
/// Cloning yields a handle to the same fields.
pub struct PromiseBox<D> {
    promise_state: Observable<Option<PromiseState>>,
    data: Observable<Option<D>>,
    /// Bumped each time a binding starts on this box.
    generation: Rc<Cell<u64>>,
}

impl<D> Clone for PromiseBox<D> {
    fn clone(&self) -> Self {
        Self {
            promise_state: self.promise_state.clone(),
            data: self.data.clone(),
            generation: Rc::clone(&self.generation),
        }
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for PromiseBox<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromiseBox")
            .field("promise_state", &self.promise_state)
            .field("data", &self.data)
            .field("generation", &self.generation.get())
            .finish()
    }
}

impl<D: Clone + PartialEq + 'static> Default for PromiseBox<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + PartialEq + 'static> PromiseBox<D> {
    /// A box with neither field set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            promise_state: Observable::new(None),
            data: Observable::new(None),
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// A box whose `data` starts at `data`, e.g. to seed a transform.
    #[must_use]
    pub fn with_data(data: D) -> Self {
        let this = Self::new();
        this.data.set(Some(data));
        this
    }

    #[must_use]
    pub fn promise_state(&self) -> Option<PromiseState> {
        self.promise_state.get()
    }

    #[must_use]
    pub fn data(&self) -> Option<D> {
        self.data.get()
    }

    /// Borrow `data` without cloning it.
    pub fn with_data_ref<R>(&self, f: impl FnOnce(Option<&D>) -> R) -> R {
        self.data.with(|data| f(data.as_ref()))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.promise_state() == Some(PromiseState::Pending)
    }

    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.promise_state() == Some(PromiseState::Fulfilled)
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.promise_state() == Some(PromiseState::Rejected)
    }

    /// The observable behind `promise_state`.
    #[must_use]
    pub fn state_observable(&self) -> &Observable<Option<PromiseState>> {
        &self.promise_state
    }

    /// The observable behind `data`.
    #[must_use]
    pub fn data_observable(&self) -> &Observable<Option<D>> {
        &self.data
    }

    /// Shorthand for subscribing to `promise_state`.
    pub fn subscribe_state(
        &self,
        callback: impl Fn(&Option<PromiseState>) + 'static,
    ) -> Subscription {
        self.promise_state.subscribe(callback)
    }

    /// Shorthand for subscribing to `data`.
    pub fn subscribe_data(&self, callback: impl Fn(&Option<D>) + 'static) -> Subscription {
        self.data.subscribe(callback)
    }

    /// Number of bindings ever started on this box.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Rewrite `data` with its own value inside an action.
    ///
    /// Applying a decorator does this once so the field has gone through the
    /// reactive layer before the first pending transition. Equal writes are
    /// no-ops, so observers are not notified.
    pub fn touch(&self) {
        action("register-observable", || {
            self.data.set(self.data.get());
        });
        trace!(generation = self.generation(), "container touched");
    }

    pub(crate) fn begin_binding(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    pub(crate) fn set_state(&self, state: PromiseState) {
        self.promise_state.set(Some(state));
    }

    pub(crate) fn set_data(&self, data: D) {
        self.data.set(Some(data));
    }
}

/// Resolves the container a binding writes to from a target value.
pub trait ContainerKey<H: ?Sized, D> {
    fn resolve(&self, target: &H) -> PromiseBox<D>;
}

/// The target is itself the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfKey;

impl<D> ContainerKey<PromiseBox<D>, D> for SelfKey {
    fn resolve(&self, target: &PromiseBox<D>) -> PromiseBox<D> {
        target.clone()
    }
}

impl<H: ?Sized, D, F> ContainerKey<H, D> for F
where
    F: Fn(&H) -> PromiseBox<D>,
{
    fn resolve(&self, target: &H) -> PromiseBox<D> {
        self(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Store {
        user: PromiseBox<String>,
    }

    #[test]
    fn new_box_is_unset() {
        let container: PromiseBox<u32> = PromiseBox::new();
        assert_eq!(container.promise_state(), None);
        assert_eq!(container.data(), None);
        assert_eq!(container.generation(), 0);
        assert!(!container.is_pending());
    }

    #[test]
    fn seeded_data() {
        let container = PromiseBox::with_data(10);
        assert_eq!(container.data(), Some(10));
        assert_eq!(container.with_data_ref(|d| d.copied()), Some(10));
        assert_eq!(container.promise_state(), None);
    }

    #[test]
    fn clones_share_fields() {
        let a: PromiseBox<u8> = PromiseBox::new();
        let b = a.clone();
        a.set_state(PromiseState::Pending);
        a.set_data(3);
        assert!(b.is_pending());
        assert_eq!(b.data(), Some(3));
        assert_eq!(b.begin_binding(), 1);
        assert_eq!(a.generation(), 1);
    }

    #[test]
    fn state_predicates() {
        let container: PromiseBox<()> = PromiseBox::new();
        container.set_state(PromiseState::Fulfilled);
        assert!(container.is_fulfilled());
        container.set_state(PromiseState::Rejected);
        assert!(container.is_rejected());
        assert!(!container.is_fulfilled());
    }

    #[test]
    fn touch_keeps_value_and_version() {
        let container = PromiseBox::with_data("kept".to_string());
        let before = container.data_observable().version();
        let notified = Rc::new(Cell::new(false));
        let flag = Rc::clone(&notified);
        let _sub = container.subscribe_data(move |_| flag.set(true));

        container.touch();

        assert_eq!(container.data().as_deref(), Some("kept"));
        assert_eq!(container.data_observable().version(), before);
        assert!(!notified.get());
    }

    #[test]
    fn self_key_resolves_to_same_box() {
        let container: PromiseBox<i32> = PromiseBox::new();
        let resolved = SelfKey.resolve(&container);
        resolved.set_data(7);
        assert_eq!(container.data(), Some(7));
    }

    #[test]
    fn field_key_resolves_host_field() {
        let store = Store {
            user: PromiseBox::new(),
        };
        let key = |s: &Store| s.user.clone();
        key.resolve(&store).set_data("ada".into());
        assert_eq!(store.user.data().as_deref(), Some("ada"));
    }

    #[test]
    fn subscribe_state_sees_transitions() {
        let container: PromiseBox<()> = PromiseBox::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = container.subscribe_state(move |s| seen_clone.borrow_mut().push(*s));

        container.set_state(PromiseState::Pending);
        container.set_state(PromiseState::Fulfilled);

        assert_eq!(
            *seen.borrow(),
            vec![Some(PromiseState::Pending), Some(PromiseState::Fulfilled)]
        );
    }
}
