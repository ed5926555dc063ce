//! Per-name lock registry for serializing mutations on a single item.
//!
//! Locking is key-granular: operations on different names never contend,
//! and there is no store-wide lock anywhere on the request path. Entries
//! are created on first use and reclaimed as soon as the last holder or
//! waiter for a name lets go, so the registry stays proportional to the
//! set of names currently in flight, not to the set of stored items.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of live per-name locks.
pub struct KeyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquires the lock for `name`, waiting behind any current holder.
    ///
    /// Fairness comes from the underlying mutex: waiters for the same
    /// name queue in FIFO order. Holders of other names are unaffected.
    pub async fn acquire(&self, name: &str) -> KeyGuard<'_> {
        let lock = self
            .locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        // The map shard guard is gone here; only the per-name mutex is
        // awaited, so contention on one name never stalls another.
        let permit = lock.lock_owned().await;

        KeyGuard {
            locks: &self.locks,
            name: name.to_string(),
            permit: Some(permit),
        }
    }

    /// Number of names with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive hold on one name, released on drop.
pub struct KeyGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    name: String,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so the Arc count seen below reflects only the map
        // entry and any queued waiters.
        self.permit.take();

        // A waiter still holds a clone of the Arc, which keeps the count
        // above one and the entry alive; the shard lock taken by
        // `remove_if` makes the count check atomic against a concurrent
        // `acquire` cloning the entry.
        self.locks
            .remove_if(&self.name, |_, lock| Arc::strong_count(lock) == 1);
    }
}
