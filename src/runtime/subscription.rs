//! Subscriber registry and cancellation handles.

use crate::runtime::machine::Shared;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Callback invoked with the new state name after every committed transition.
pub type Callback = Arc<dyn Fn(&str) + Send + Sync>;

/// Live subscribers of one machine, keyed by subscription key.
///
/// Iteration order is unspecified.
#[derive(Default)]
pub(crate) struct Subscribers {
    callbacks: HashMap<u64, Callback>,
}

impl Subscribers {
    pub(crate) fn insert(&mut self, key: u64, callback: Callback) {
        self.callbacks.insert(key, callback);
    }

    /// Remove a subscriber; removing an absent key is a no-op.
    pub(crate) fn remove(&mut self, key: u64) -> bool {
        self.callbacks.remove(&key).is_some()
    }

    pub(crate) fn contains(&self, key: u64) -> bool {
        self.callbacks.contains_key(&key)
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Clone out every callback so they can be invoked without the lock.
    pub(crate) fn snapshot(&self) -> Vec<Callback> {
        self.callbacks.values().cloned().collect()
    }
}

/// Handle returned by [`Machine::subscribe`](crate::Machine::subscribe).
///
/// Dropping the handle does not cancel the subscription; call
/// [`cancel`](Self::cancel). The handle holds only a weak reference, so it
/// never keeps a machine alive.
#[must_use = "dropping a Subscription does not cancel it; keep it to call `cancel`"]
pub struct Subscription {
    key: u64,
    machine: Weak<Shared>,
}

impl Subscription {
    pub(crate) fn new(key: u64, machine: Weak<Shared>) -> Self {
        Self { key, machine }
    }

    /// Unique key of this subscription within its machine.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Stop delivering notifications. Safe to call any number of times.
    ///
    /// Every transition that commits after this returns skips the callback. A
    /// notification already being delivered on another thread may still
    /// reach it.
    pub fn cancel(&self) {
        if let Some(shared) = self.machine.upgrade() {
            shared.unsubscribe(self.key);
        }
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.machine
            .upgrade()
            .is_some_and(|shared| shared.is_subscribed(self.key))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}
