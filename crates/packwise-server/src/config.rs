//! Configuration for the packing-list server.
//!
//! Settings come from environment variables or a TOML file. Both paths
//! end in [`ServerConfig::validate`], which runs before any client is built.

use packwise_domain::knowledge::DEFAULT_CACHE_ROOT;
use packwise_ingest::IngestConfig;
use packwise_llm::gemini::DEFAULT_MODEL;
use packwise_pipeline::DEFAULT_REQUEST_TIMEOUT_SECS;
use packwise_synthesizer::SynthesizerConfig;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Field or variable name
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// GCP project id
    pub gcp_project: String,

    /// Vertex AI region for the generative model
    #[serde(default = "default_region")]
    pub gcp_region: String,

    /// Bucket holding cached source pages
    pub bucket: String,

    /// Custom Search API key
    pub search_api_key: String,

    /// Custom Search engine id (`cx`)
    pub search_engine_id: String,

    /// Discovery Engine app id
    pub answer_engine_id: String,

    /// Discovery Engine location
    #[serde(default = "default_answer_location")]
    pub answer_engine_location: String,

    /// Answer language code
    #[serde(default = "default_answer_language")]
    pub answer_language: String,

    /// Generative model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Static bearer token for Google APIs
    #[serde(default)]
    pub access_token: Option<String>,

    /// End-to-end request deadline (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Per-page fetch timeout (seconds)
    #[serde(default = "default_page_fetch_timeout")]
    pub page_fetch_timeout_secs: u64,

    /// Search results to ingest per destination (1-10)
    #[serde(default = "default_search_max_results")]
    pub search_max_results: usize,

    /// Object-name root for cached pages
    #[serde(default = "default_cache_root")]
    pub cache_root: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_region() -> String {
    "us-central1".to_string()
}

fn default_answer_location() -> String {
    "global".to_string()
}

fn default_answer_language() -> String {
    "ja".to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_page_fetch_timeout() -> u64 {
    10
}

fn default_search_max_results() -> usize {
    5
}

fn default_cache_root() -> String {
    DEFAULT_CACHE_ROOT.to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| ConfigError::MissingField(key.to_string()));

        let config = ServerConfig {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(default_bind_address),
            bind_port: parse_or(get("PORT"), "PORT", default_bind_port())?,
            gcp_project: required("GCP_PROJECT")?,
            gcp_region: get("GCP_REGION").unwrap_or_else(default_region),
            bucket: required("GCS_BUCKET_NAME")?,
            search_api_key: required("CUSTOM_SEARCH_API_KEY")?,
            search_engine_id: required("CUSTOM_SEARCH_CX")?,
            answer_engine_id: required("DISCOVERY_ENGINE_ID")?,
            answer_engine_location: get("DISCOVERY_ENGINE_LOCATION")
                .unwrap_or_else(default_answer_location),
            answer_language: get("ANSWER_LANGUAGE_CODE").unwrap_or_else(default_answer_language),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(default_gemini_model),
            access_token: get("GCP_ACCESS_TOKEN"),
            request_timeout_secs: parse_or(
                get("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                default_request_timeout(),
            )?,
            page_fetch_timeout_secs: parse_or(
                get("PAGE_FETCH_TIMEOUT_SECS"),
                "PAGE_FETCH_TIMEOUT_SECS",
                default_page_fetch_timeout(),
            )?,
            search_max_results: parse_or(
                get("SEARCH_MAX_RESULTS"),
                "SEARCH_MAX_RESULTS",
                default_search_max_results(),
            )?,
            cache_root: get("CACHE_ROOT").unwrap_or_else(default_cache_root),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check required fields and ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("gcp_project", &self.gcp_project),
            ("bucket", &self.bucket),
            ("search_api_key", &self.search_api_key),
            ("search_engine_id", &self.search_engine_id),
            ("answer_engine_id", &self.answer_engine_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "must be greater than 0"));
        }
        self.ingest_config()
            .validate()
            .map_err(|reason| invalid("ingest", reason))?;
        self.synthesizer_config()
            .validate()
            .map_err(|reason| invalid("synthesizer", reason))?;
        Ok(())
    }

    /// Ingestion settings derived from this configuration
    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            max_results: self.search_max_results,
            fetch_timeout_secs: self.page_fetch_timeout_secs,
            cache_root: self.cache_root.clone(),
            ..IngestConfig::default()
        }
    }

    /// Synthesis settings derived from this configuration
    pub fn synthesizer_config(&self) -> SynthesizerConfig {
        SynthesizerConfig::default()
    }

    /// Create a configuration for tests
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            gcp_project: "test-project".to_string(),
            gcp_region: default_region(),
            bucket: "test-bucket".to_string(),
            search_api_key: "test-key".to_string(),
            search_engine_id: "test-cx".to_string(),
            answer_engine_id: "test-engine".to_string(),
            answer_engine_location: default_answer_location(),
            answer_language: default_answer_language(),
            gemini_model: default_gemini_model(),
            access_token: None,
            request_timeout_secs: default_request_timeout(),
            page_fetch_timeout_secs: default_page_fetch_timeout(),
            search_max_results: default_search_max_results(),
            cache_root: default_cache_root(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, format!("'{}': {}", value, e))),
        None => Ok(default),
    }
}
