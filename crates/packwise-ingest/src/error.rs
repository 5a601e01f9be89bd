//! Error types for ingestion

use thiserror::Error;

/// Errors from the web-search provider
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider returned a non-success status
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
}

/// Errors fetching a single page
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Server returned a non-success status
    #[error("HTTP {0}")]
    Http(u16),

    /// Fetch exceeded its time budget
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// Body could not be read as text
    #[error("Unreadable body: {0}")]
    Body(String),
}

/// Fatal ingestion errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// Search succeeded but returned no links
    #[error("Web search returned no results for '{query}'")]
    NoSearchResults {
        /// Query that was sent
        query: String,
    },

    /// Search provider call failed
    #[error("Web search failed: {0}")]
    SearchProvider(#[from] SearchError),
}
