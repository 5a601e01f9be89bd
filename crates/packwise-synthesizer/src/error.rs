//! Error types for the Synthesizer

use thiserror::Error;

/// Why no JSON could be cut out of model output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Model returned no text
    #[error("model output is empty")]
    Empty,

    /// No `{ ... }` span present
    #[error("no JSON object found in model output")]
    NoObject,
}

/// Errors that can occur during synthesis
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Generative model call failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Generative model did not answer within its budget
    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    /// Model output could not be turned into a packing list
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
}

impl From<ExtractError> for SynthesisError {
    fn from(e: ExtractError) -> Self {
        SynthesisError::MalformedOutput(e.to_string())
    }
}

impl From<serde_json::Error> for SynthesisError {
    fn from(e: serde_json::Error) -> Self {
        SynthesisError::MalformedOutput(format!("JSON parse error: {}", e))
    }
}
