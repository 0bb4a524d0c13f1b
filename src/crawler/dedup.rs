//! Exactly-once gate for discovered URLs

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Concurrency-safe set of URL keys already seen this run
///
/// One mutex guards one set. Expected cardinality is around ten thousand
/// keys, so the lock is not sharded; sharding by key hash is the upgrade
/// path if discovery ever contends on it.
#[derive(Debug, Default)]
pub struct DedupSet {
    keys: Mutex<HashSet<String>>,
}

impl DedupSet {
    /// Creates a set pre-sized for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Mutex::new(HashSet::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panicking holder cannot leave the set half-updated.
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn add(&self, key: &str) {
        self.lock().insert(key.to_string());
    }

    /// Inserts `key` and returns true iff this call performed the insertion
    ///
    /// Among any number of concurrent callers racing on the same key,
    /// exactly one observes `true`.
    pub fn add_if_not_exists(&self, key: &str) -> bool {
        let mut keys = self.lock();
        if keys.contains(key) {
            false
        } else {
            keys.insert(key.to_string())
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
