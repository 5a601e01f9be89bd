//! Core Synthesizer implementation

use crate::config::SynthesizerConfig;
use crate::error::SynthesisError;
use crate::extraction::{BraceSpanExtractor, JsonExtractor};
use crate::parser::parse_packing_list;
use crate::prompt::PromptBuilder;
use packwise_domain::PackingListResult;
use packwise_llm::{LlmError, TextGenerator};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Turns a grounding summary into a structured packing list
#[derive(Clone)]
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
    extractor: Arc<dyn JsonExtractor>,
    config: SynthesizerConfig,
}

impl Synthesizer {
    /// Create a new Synthesizer using the brace-span extractor
    pub fn new(generator: Arc<dyn TextGenerator>, config: SynthesizerConfig) -> Self {
        Self {
            generator,
            extractor: Arc::new(BraceSpanExtractor),
            config,
        }
    }

    /// Replace the JSON extraction strategy
    pub fn with_extractor(mut self, extractor: Arc<dyn JsonExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Generate a packing list for `destination` over `days` days.
    ///
    /// The returned summary is `answer_text` unchanged.
    #[instrument(skip_all, fields(destination = %destination, days = days))]
    pub async fn synthesize(
        &self,
        answer_text: &str,
        destination: &str,
        days: u32,
    ) -> Result<PackingListResult, SynthesisError> {
        let prompt = PromptBuilder::new(destination, days, answer_text)
            .with_summary_limit(self.config.max_summary_chars)
            .build();

        debug!(
            model = self.generator.model_name(),
            prompt_chars = prompt.chars().count(),
            "calling generative model"
        );

        let raw = match timeout(
            self.config.generation_timeout(),
            self.generator.generate(&prompt),
        )
        .await
        {
            Ok(Ok(text)) => text,
            // No text at all is bad output, not a failed call
            Ok(Err(LlmError::Blocked(reason))) => {
                warn!(%reason, "model returned no text");
                return Err(SynthesisError::MalformedOutput(format!(
                    "model returned no text: {}",
                    reason
                )));
            }
            Ok(Err(e)) => {
                warn!(error = %e, "generation failed");
                return Err(SynthesisError::Generation(e.to_string()));
            }
            Err(_) => {
                warn!(
                    secs = self.config.generation_timeout_secs,
                    "generation timed out"
                );
                return Err(SynthesisError::Timeout(self.config.generation_timeout_secs));
            }
        };

        let json = self.extractor.extract(&raw).map_err(|e| {
            warn!(error = %e, output_chars = raw.chars().count(), "no JSON in model output");
            SynthesisError::from(e)
        })?;
        let items = parse_packing_list(json)?;

        info!(items = items.len(), "packing list synthesized");

        Ok(PackingListResult {
            destination: destination.to_string(),
            days,
            summary: answer_text.to_string(),
            items,
        })
    }
}
