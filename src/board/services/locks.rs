//! Keyed async locks serialising engine operations on shared resources.
//!
//! The unit of contention is a column for placement operations and a root
//! task's subtree for company cascades. Operations on the same key are
//! serialised; operations on disjoint keys run fully in parallel. A
//! cross-column move acquires both column locks in a canonical key order so
//! two concurrent moves between the same pair of columns cannot deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-key exclusive locks.
#[derive(Debug, Default)]
pub(crate) struct LockRegistry {
    locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the lock handle for a key, creating it on first use.
    ///
    /// Handles nobody holds or waits on are evicted on the way, keeping the
    /// registry bounded by the number of keys currently in use rather than
    /// every key ever locked.
    fn handle(&self, key: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(key).or_default())
    }

    /// Number of keys currently tracked by the registry.
    pub(crate) fn tracked_keys(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Acquires the lock for a single key.
    pub(crate) async fn acquire(&self, key: Uuid) -> OwnedMutexGuard<()> {
        self.handle(key).lock_owned().await
    }

    /// Acquires the locks for a pair of keys in canonical order.
    ///
    /// Equal keys take a single lock.
    pub(crate) async fn acquire_pair(
        &self,
        first: Uuid,
        second: Uuid,
    ) -> (OwnedMutexGuard<()>, Option<OwnedMutexGuard<()>>) {
        if first == second {
            return (self.acquire(first).await, None);
        }
        let (lo, hi) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let lo_guard = self.acquire(lo).await;
        let hi_guard = self.acquire(hi).await;
        (lo_guard, Some(hi_guard))
    }
}
