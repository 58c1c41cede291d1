//! Keyed operation locks.
//!
//! Operations on the same case id or the same member must not interleave;
//! operations on unrelated keys should. One `Arc<Mutex<()>>` per key, handed
//! out on demand, gives exactly that: callers lock the key's mutex for the
//! duration of the operation while the registry map itself is held only for
//! the lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// A lazily populated map of per-key mutexes.
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The mutex guarding `key`, created on first use.
    ///
    /// Keys are never evicted: one stale `Arc<Mutex<()>>` per case/member
    /// ever touched is far cheaper than getting eviction-vs-contention
    /// right, and the set of keys is bounded by real platform activity.
    pub fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("keyed lock registry poisoned");
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Number of keys ever locked.
    pub fn len(&self) -> usize {
        self.locks.lock().expect("keyed lock registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for KeyedLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Hold a key's lock for the rest of the enclosing scope.
pub fn hold(lock: &Arc<Mutex<()>>) -> MutexGuard<'_, ()> {
    lock.lock().expect("keyed operation lock poisoned")
}
