//! Configuration for ingestion

use packwise_domain::knowledge::DEFAULT_CACHE_ROOT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Domain keywords appended to the destination to form the search query
/// ("travel packing list" in the answer locale)
pub const DEFAULT_SEARCH_KEYWORDS: &str = "旅行 持ち物 リスト";

/// Hard cap imposed by the search provider on results per call
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Configuration for the Ingestor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Links requested from the search provider
    pub max_results: usize,

    /// Per-page fetch timeout (seconds)
    pub fetch_timeout_secs: u64,

    /// Keywords appended to the destination
    pub search_keywords: String,

    /// Object-name root for cached pages
    pub cache_root: String,
}

impl IngestConfig {
    /// Get the fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_results == 0 || self.max_results > MAX_SEARCH_RESULTS {
            return Err(format!(
                "max_results must be between 1 and {}",
                MAX_SEARCH_RESULTS
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        if self.cache_root.trim_matches('/').is_empty() {
            return Err("cache_root must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            fetch_timeout_secs: 10,
            search_keywords: DEFAULT_SEARCH_KEYWORDS.to_string(),
            cache_root: DEFAULT_CACHE_ROOT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_results, 5);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_max_results() {
        let mut config = IngestConfig::default();
        config.max_results = 0;
        assert!(config.validate().is_err());

        config.max_results = MAX_SEARCH_RESULTS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout_and_root() {
        let mut config = IngestConfig::default();
        config.fetch_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = IngestConfig::default();
        config.cache_root = "/".to_string();
        assert!(config.validate().is_err());
    }
}
