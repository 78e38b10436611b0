//! Property-based invariant tests for observables and batch scopes.
//!
//! 1. Version equals the number of value-changing writes.
//! 2. Outside a batch, subscribers see one notification per change.
//! 3. Inside a batch, each subscriber sees at most one notification, carrying
//!    the final value.
//! 4. Nesting depth never changes the flushed result.

use std::cell::RefCell;
use std::rc::Rc;

use promisebind_reactive::{BatchScope, Observable, action, is_batching};
use proptest::prelude::*;

fn writes_strategy() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..4, 0..32)
}

fn count_changes(initial: u8, writes: &[u8]) -> u64 {
    let mut current = initial;
    let mut changes = 0;
    for &w in writes {
        if w != current {
            current = w;
            changes += 1;
        }
    }
    changes
}

fn recorder(obs: &Observable<u8>) -> (Rc<RefCell<Vec<u8>>>, promisebind_reactive::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let sub = obs.subscribe(move |v| seen_clone.borrow_mut().push(*v));
    (seen, sub)
}

proptest! {
    #[test]
    fn version_counts_changes(writes in writes_strategy()) {
        let obs = Observable::new(0u8);
        for &w in &writes {
            obs.set(w);
        }
        prop_assert_eq!(obs.version(), count_changes(0, &writes));
    }

    #[test]
    fn unbatched_notifications_match_version(writes in writes_strategy()) {
        let obs = Observable::new(0u8);
        let (seen, _sub) = recorder(&obs);
        for &w in &writes {
            obs.set(w);
        }
        prop_assert_eq!(seen.borrow().len() as u64, obs.version());
    }

    #[test]
    fn batched_notifications_coalesce(writes in writes_strategy()) {
        let obs = Observable::new(0u8);
        let (seen, _sub) = recorder(&obs);

        action("writes", || {
            for &w in &writes {
                obs.set(w);
            }
        });

        let seen = seen.borrow();
        prop_assert!(seen.len() <= 1);
        if count_changes(0, &writes) > 0 {
            prop_assert_eq!(seen.as_slice(), &[obs.get()]);
        }
        prop_assert!(!is_batching());
    }

    #[test]
    fn nesting_depth_is_transparent(writes in writes_strategy(), depth in 1usize..5) {
        let obs = Observable::new(0u8);
        let (seen, _sub) = recorder(&obs);

        let scopes: Vec<BatchScope> = (0..depth).map(|_| BatchScope::new()).collect();
        for &w in &writes {
            obs.set(w);
        }
        prop_assert!(seen.borrow().is_empty());
        drop(scopes);

        prop_assert!(seen.borrow().len() <= 1);
        prop_assert_eq!(BatchScope::depth(), 0);
    }
}
