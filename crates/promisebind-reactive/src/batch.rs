#![forbid(unsafe_code)]

//! Deferred notification scopes.
//!
//! A [`BatchScope`] marks a region in which [`Observable`](crate::Observable)
//! writes take effect immediately but subscriber notification is postponed.
//! When the outermost scope on the current thread is dropped, every observable
//! that changed inside it is notified once, in the order it first changed.
//!
//! # Failure Modes
//!
//! - **Panic inside a scope**: pending notifications are discarded while the
//!   thread is unwinding. Values written before the panic stay written.

use std::cell::RefCell;
use std::marker::PhantomData;

type Deferred = Box<dyn FnOnce()>;

#[derive(Default)]
struct BatchContext {
    depth: usize,
    /// Keyed by observable identity so repeated writes coalesce.
    pending: Vec<(usize, Deferred)>,
}

thread_local! {
    static BATCH: RefCell<BatchContext> = RefCell::new(BatchContext::default());
}

/// RAII guard deferring observable notifications until drop.
///
/// Scopes nest. Only dropping the outermost scope flushes.
///
/// `BatchScope` is `!Send`: the batch context is thread-local, so a scope
/// must be dropped on the thread that created it.
pub struct BatchScope {
    _not_send: PhantomData<*const ()>,
}

impl BatchScope {
    /// Open a new (possibly nested) batch scope.
    #[must_use = "notifications flush when the scope is dropped"]
    pub fn new() -> Self {
        BATCH.with(|ctx| ctx.borrow_mut().depth += 1);
        Self {
            _not_send: PhantomData,
        }
    }

    /// Current nesting depth on this thread. Zero means no scope is open.
    #[must_use]
    pub fn depth() -> usize {
        BATCH.with(|ctx| ctx.borrow().depth)
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("depth", &Self::depth())
            .finish()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let outermost = BATCH.with(|ctx| {
            let mut ctx = ctx.borrow_mut();
            ctx.depth = ctx.depth.saturating_sub(1);
            ctx.depth == 0
        });
        if !outermost {
            return;
        }
        if std::thread::panicking() {
            BATCH.with(|ctx| ctx.borrow_mut().pending.clear());
            return;
        }
        flush();
    }
}

/// Whether a batch scope is open on the current thread.
#[must_use]
pub fn is_batching() -> bool {
    BatchScope::depth() > 0
}

/// Queue `notify` under `key` if a batch is open.
///
/// Returns the closure back when no batch is open so the caller can run it
/// immediately. A key already queued keeps its original position and the
/// new closure is dropped.
pub(crate) fn defer(key: usize, notify: Deferred) -> Result<(), Deferred> {
    BATCH.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        if ctx.depth == 0 {
            return Err(notify);
        }
        if !ctx.pending.iter().any(|(k, _)| *k == key) {
            ctx.pending.push((key, notify));
        }
        Ok(())
    })
}

fn flush() {
    // Take the queue out before running callbacks: subscribers may write to
    // other observables, which must not see a borrowed context. Depth is zero
    // here, so those writes notify immediately instead of queueing.
    let pending = BATCH.with(|ctx| std::mem::take(&mut ctx.borrow_mut().pending));
    for (_, notify) in pending {
        notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Observable;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn depth_tracks_nesting() {
        assert_eq!(BatchScope::depth(), 0);
        let outer = BatchScope::new();
        assert_eq!(BatchScope::depth(), 1);
        {
            let _inner = BatchScope::new();
            assert_eq!(BatchScope::depth(), 2);
        }
        assert_eq!(BatchScope::depth(), 1);
        drop(outer);
        assert!(!is_batching());
    }

    #[test]
    fn notifications_deferred_until_scope_exit() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        let scope = BatchScope::new();
        obs.set(1);
        assert_eq!(obs.get(), 1, "value visible inside the batch");
        assert_eq!(count.get(), 0);
        drop(scope);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn repeated_writes_coalesce_to_latest() {
        let obs = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = obs.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        {
            let _scope = BatchScope::new();
            obs.set(1);
            obs.set(2);
            obs.set(3);
        }

        assert_eq!(*seen.borrow(), vec![3]);
        assert_eq!(obs.version(), 3);
    }

    #[test]
    fn nested_scope_flushes_only_at_outermost() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        let outer = BatchScope::new();
        {
            let _inner = BatchScope::new();
            obs.set(5);
        }
        assert_eq!(count.get(), 0);
        drop(outer);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn flush_order_is_first_change_order() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        let _sa = a.subscribe(move |_| log_a.borrow_mut().push('a'));
        let log_b = Rc::clone(&log);
        let _sb = b.subscribe(move |_| log_b.borrow_mut().push('b'));

        {
            let _scope = BatchScope::new();
            b.set(1);
            a.set(1);
            b.set(2);
        }

        assert_eq!(*log.borrow(), vec!['b', 'a']);
    }

    #[test]
    fn unchanged_value_in_batch_does_not_notify() {
        let obs = Observable::new(7);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        {
            let _scope = BatchScope::new();
            obs.set(7);
        }
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn subscriber_write_during_flush_is_delivered() {
        let source = Observable::new(0);
        let mirror = Observable::new(0);
        let mirror_seen = Rc::new(Cell::new(0));

        let mirror_clone = mirror.clone();
        let _s1 = source.subscribe(move |v| {
            mirror_clone.set(*v * 10);
        });
        let seen_clone = Rc::clone(&mirror_seen);
        let _s2 = mirror.subscribe(move |v| seen_clone.set(*v));

        {
            let _scope = BatchScope::new();
            source.set(4);
        }
        assert_eq!(mirror.get(), 40);
        assert_eq!(mirror_seen.get(), 40);
    }

    #[test]
    fn panic_inside_scope_discards_pending() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = BatchScope::new();
            obs.set(1);
            panic!("batch aborted");
        }));

        assert!(result.is_err());
        assert_eq!(count.get(), 0, "queued notification dropped");
        assert_eq!(obs.get(), 1, "write before the panic stays");
        assert_eq!(BatchScope::depth(), 0);

        obs.set(2);
        assert_eq!(count.get(), 1, "later writes notify normally");
    }
}
