//! Cache probe: is there a knowledge artifact for this destination?

use crate::{ObjectStore, StoreError};
use packwise_domain::KnowledgeKey;
use std::sync::Arc;
use tracing::debug;

/// Answers whether cached pages exist for a destination
#[derive(Clone)]
pub struct CacheProbe {
    store: Arc<dyn ObjectStore>,
    root: String,
}

impl CacheProbe {
    /// Create a probe over `store`, looking under `root` (e.g. `html`)
    pub fn new(store: Arc<dyn ObjectStore>, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    /// Object-name root this probe looks under
    pub fn root(&self) -> &str {
        &self.root
    }

    /// True iff at least one object exists under the destination's prefix
    pub async fn exists(&self, destination: &str) -> Result<bool, StoreError> {
        let prefix = KnowledgeKey::new(destination).prefix(&self.root);
        let found = self.store.list_prefix(&prefix, 1).await?;
        debug!(%prefix, hit = !found.is_empty(), "cache probe");
        Ok(!found.is_empty())
    }
}
