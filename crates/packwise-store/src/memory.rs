//! In-memory object store

use crate::{ObjectStore, StoreError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object body
    pub body: String,
    /// MIME type recorded on write
    pub content_type: String,
}

#[derive(Debug, Default)]
struct Inner {
    objects: BTreeMap<String, StoredObject>,
    rejected: HashSet<String>,
    fail_listing: bool,
    list_calls: usize,
    put_calls: usize,
}

/// Process-local object store
///
/// Clones share the same contents. Writes to names registered with
/// [`MemoryStore::reject_writes_to`] fail, and listing can be made to fail,
/// so callers' error paths can be exercised.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every subsequent write to `name` fail
    pub fn reject_writes_to(&self, name: impl Into<String>) {
        self.lock().rejected.insert(name.into());
    }

    /// Toggle listing failures
    pub fn fail_listing(&self, fail: bool) {
        self.lock().fail_listing = fail;
    }

    /// Fetch a stored object
    pub fn get(&self, name: &str) -> Option<StoredObject> {
        self.lock().objects.get(name).cloned()
    }

    /// All object names, sorted
    pub fn names(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.lock().objects.len()
    }

    /// True if nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `list_prefix` calls so far
    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    /// Number of `put` calls so far, including rejected ones
    pub fn put_calls(&self) -> usize {
        self.lock().put_calls
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_prefix(&self, prefix: &str, max_results: usize) -> Result<Vec<String>, StoreError> {
        let mut inner = self.lock();
        inner.list_calls += 1;
        if inner.fail_listing {
            return Err(StoreError::Communication("listing unavailable".to_string()));
        }

        Ok(inner
            .objects
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .take(max_results)
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn put(&self, name: &str, body: String, content_type: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.put_calls += 1;
        if inner.rejected.contains(name) {
            return Err(StoreError::Rejected(name.to_string()));
        }

        inner.objects.insert(
            name.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
