//! Pipeline error taxonomy

use packwise_answer::AnswerError;
use packwise_domain::DomainError;
use packwise_ingest::IngestError;
use packwise_store::StoreError;
use packwise_synthesizer::SynthesisError;
use thiserror::Error;

/// Request-fatal pipeline failures
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Destination or day count failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// Web search returned nothing for an uncached destination (carries the query)
    #[error("No search results found for query: {0}")]
    NoSearchResults(String),

    /// Web search provider call failed
    #[error("Search provider error: {0}")]
    SearchProvider(String),

    /// Knowledge store listing failed
    #[error("Cache probe failed: {0}")]
    CacheProbe(#[from] StoreError),

    /// Answer engine call failed
    #[error("Answer engine error: {0}")]
    AnswerEngine(#[from] AnswerError),

    /// Answer engine returned no usable text
    #[error("No answer was generated for destination: {0}")]
    NoAnswerGenerated(String),

    /// Model output was not a valid packing list
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    /// Generative model call failed or timed out
    #[error("Generation failed: {0}")]
    Generation(String),

    /// End-to-end request deadline expired
    #[error("Request exceeded its {0}s deadline")]
    DeadlineExceeded(u64),
}

impl PipelineError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::InvalidRequest(_) => 422,
            PipelineError::NoSearchResults(_) | PipelineError::NoAnswerGenerated(_) => 404,
            PipelineError::DeadlineExceeded(_) => 504,
            PipelineError::SearchProvider(_)
            | PipelineError::CacheProbe(_)
            | PipelineError::AnswerEngine(_)
            | PipelineError::MalformedModelOutput(_)
            | PipelineError::Generation(_) => 500,
        }
    }

    /// True for errors caused by the caller or by missing data, not by a provider
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<IngestError> for PipelineError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::NoSearchResults { query } => PipelineError::NoSearchResults(query),
            IngestError::SearchProvider(e) => PipelineError::SearchProvider(e.to_string()),
        }
    }
}

impl From<SynthesisError> for PipelineError {
    fn from(e: SynthesisError) -> Self {
        match e {
            SynthesisError::MalformedOutput(msg) => PipelineError::MalformedModelOutput(msg),
            SynthesisError::Generation(_) | SynthesisError::Timeout(_) => {
                PipelineError::Generation(e.to_string())
            }
        }
    }
}
