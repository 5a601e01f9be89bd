//! Packwise Storage Layer
//!
//! Durable object storage for cached source pages, and the cache probe that
//! decides whether a destination needs ingesting.
//!
//! # Backends
//!
//! - `GcsStore`: Cloud Storage JSON API over HTTP
//! - `MemoryStore`: process-local map for tests and local runs
//!
//! # Examples
//!
//! ```
//! use packwise_store::{CacheProbe, MemoryStore, ObjectStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), packwise_store::StoreError> {
//! let store = Arc::new(MemoryStore::new());
//! let probe = CacheProbe::new(store.clone(), "html");
//! assert!(!probe.exists("Hawaii").await?);
//!
//! store.put("html/Hawaii/source_1.html", "<html/>".into(), "text/html").await?;
//! assert!(probe.exists("Hawaii").await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod gcs;
pub mod memory;
pub mod probe;

use async_trait::async_trait;
use thiserror::Error;

pub use gcs::GcsStore;
pub use memory::MemoryStore;
pub use probe::CacheProbe;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Storage service returned a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Write rejected by the backend
    #[error("Write rejected for {0}")]
    Rejected(String),
}

/// Blob storage addressed by slash-delimited object names
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List up to `max_results` object names starting with `prefix`
    ///
    /// A prefix with no objects is an empty list, never an error.
    async fn list_prefix(&self, prefix: &str, max_results: usize) -> Result<Vec<String>, StoreError>;

    /// Create or overwrite an object
    async fn put(&self, name: &str, body: String, content_type: &str) -> Result<(), StoreError>;
}
