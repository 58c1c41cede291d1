//! Operation counters shared across service threads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A fixed set of named counters, safe to bump from any thread.
///
/// The counter set is fixed at construction; incrementing a name that was
/// never registered is a silent no-op rather than a panic, so callers can
/// count optional paths without guarding.
pub struct StatsCounter {
    counters: Vec<(&'static str, AtomicU64)>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|&n| (n, AtomicU64::new(0))).collect(),
        }
    }

    fn find(&self, name: &str) -> Option<&AtomicU64> {
        self.counters
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
    }

    pub fn increment(&self, name: &str) {
        if let Some(counter) = self.find(name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.find(name).map(|c| c.load(Ordering::Relaxed)).unwrap_or(0)
    }

    /// Current value of every counter, in registration order internally
    /// but keyed by name for the caller.
    pub fn snapshot(&self) -> HashMap<&'static str, u64> {
        self.counters
            .iter()
            .map(|(n, c)| (*n, c.load(Ordering::Relaxed)))
            .collect()
    }
}
