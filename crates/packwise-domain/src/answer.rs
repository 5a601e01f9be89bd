//! Answer engine result

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query-type signal reported by the answer engine
///
/// Recorded for observability only; the pipeline never branches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClassification {
    /// Classification type (e.g. `ADVERSARIAL_QUERY`)
    pub kind: String,
    /// Whether the query matched this type
    pub positive: bool,
}

/// Synthesized answer for a destination question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Natural-language answer; may be empty when the engine declines to answer
    pub answer_text: String,
    /// Citations as returned by the engine, kept opaque
    #[serde(default)]
    pub citations: Value,
    /// Query classification signals
    #[serde(default)]
    pub classifications: Vec<QueryClassification>,
}

impl AnswerResult {
    /// Build a result carrying only answer text
    pub fn from_text(answer_text: impl Into<String>) -> Self {
        Self {
            answer_text: answer_text.into(),
            ..Self::default()
        }
    }

    /// True if the engine produced no usable text
    pub fn is_empty(&self) -> bool {
        self.answer_text.trim().is_empty()
    }

    /// Number of citations, if the engine returned them as an array
    pub fn citation_count(&self) -> usize {
        self.citations.as_array().map_or(0, Vec::len)
    }
}
