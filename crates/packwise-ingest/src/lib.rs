//! Packwise Web Ingestion
//!
//! Populates the knowledge store for a destination from web search results.
//!
//! # Architecture
//!
//! ```text
//! destination → WebSearch → links → PageFetcher → ObjectStore
//!                                          ↘ IngestionReport (stored / skipped per page)
//! ```
//!
//! A single bad page never fails ingestion: fetch and write failures are
//! recorded in the report and logged. Only a failed or empty search is fatal.

#![warn(missing_docs)]

mod config;
mod error;
pub mod fetch;
mod ingestor;
mod report;
pub mod search;

pub use config::{IngestConfig, DEFAULT_SEARCH_KEYWORDS, MAX_SEARCH_RESULTS};
pub use error::{FetchError, IngestError, SearchError};
pub use fetch::{HttpPageFetcher, PageFetcher, StaticFetcher};
pub use ingestor::Ingestor;
pub use report::{IngestionReport, PageOutcome, SkipReason};
pub use search::{CustomSearchClient, StaticSearch, WebSearch};
