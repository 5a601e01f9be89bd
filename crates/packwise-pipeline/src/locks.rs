//! Per-destination ingestion locks

use packwise_domain::KnowledgeKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

#[derive(Debug)]
struct Entry {
    slot: Slot,
    // Holder plus waiters, including waiters that have not been polled yet
    users: usize,
}

/// One async mutex per knowledge key, created on demand
///
/// Every caller of [`IngestionLocks::acquire`] is counted from the moment
/// it asks for the key until its guard drops or its wait is cancelled. The
/// entry is removed when that count reaches zero, so the map only tracks
/// destinations with ingestion in flight.
#[derive(Debug, Default, Clone)]
pub struct IngestionLocks {
    slots: Arc<Mutex<HashMap<KnowledgeKey, Entry>>>,
}

impl IngestionLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<KnowledgeKey, Entry>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for exclusive ingestion rights on `key`
    pub async fn acquire(&self, key: &KnowledgeKey) -> IngestionGuard {
        let (slot, registration) = self.register(key);
        // Dropping this future while waiting drops `registration`, which
        // forgets the key if nobody else wants it
        let guard = slot.lock_owned().await;
        IngestionGuard {
            _guard: guard,
            registration,
        }
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// True if no key is locked or awaited
    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    fn register(&self, key: &KnowledgeKey) -> (Slot, Registration) {
        let mut slots = self.slots();
        let entry = slots.entry(key.clone()).or_insert_with(|| Entry {
            slot: Slot::default(),
            users: 0,
        });
        entry.users += 1;
        let slot = entry.slot.clone();
        (
            slot,
            Registration {
                locks: self.clone(),
                key: key.clone(),
            },
        )
    }

    fn unregister(&self, key: &KnowledgeKey) {
        let mut slots = self.slots();
        let idle = match slots.get_mut(key) {
            Some(entry) => {
                entry.users = entry.users.saturating_sub(1);
                entry.users == 0
            }
            None => false,
        };
        if idle {
            slots.remove(key);
        }
    }
}

/// Counts one caller against a key until dropped
#[derive(Debug)]
struct Registration {
    locks: IngestionLocks,
    key: KnowledgeKey,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.locks.unregister(&self.key);
    }
}

/// Held while a request ingests a destination
///
/// Dropping the guard (including when the request is cancelled) unlocks
/// the key and forgets it if no one else is waiting.
#[derive(Debug)]
pub struct IngestionGuard {
    // Unlock before unregistering
    _guard: OwnedMutexGuard<()>,
    registration: Registration,
}

impl IngestionGuard {
    /// Key this guard holds
    pub fn key(&self) -> &KnowledgeKey {
        &self.registration.key
    }
}
