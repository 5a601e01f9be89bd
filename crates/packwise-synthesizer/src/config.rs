//! Configuration for the Synthesizer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Synthesizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Maximum time for the generation call (seconds)
    pub generation_timeout_secs: u64,

    /// Maximum summary length embedded in the prompt (characters)
    pub max_summary_chars: usize,
}

impl SynthesizerConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        if self.max_summary_chars == 0 {
            return Err("max_summary_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            generation_timeout_secs: 60,
            max_summary_chars: 20_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SynthesizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = SynthesizerConfig::default();
        config.generation_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
