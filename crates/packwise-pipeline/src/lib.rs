//! Packwise Pipeline Orchestrator
//!
//! Sequences the four steps that turn a trip request into a packing list:
//!
//! ```text
//! CacheProbe → [Ingestor] → AnswerClient → Synthesizer → PackingListResult
//! ```
//!
//! Ingestion only runs on a cache miss, and at most once at a time per
//! destination. The whole run is bounded by a single deadline.

#![warn(missing_docs)]

mod error;
mod locks;
mod pipeline;

pub use error::PipelineError;
pub use locks::{IngestionGuard, IngestionLocks};
pub use pipeline::{Pipeline, DEFAULT_REQUEST_TIMEOUT_SECS};
