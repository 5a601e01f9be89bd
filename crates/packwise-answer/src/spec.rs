//! Answer generation settings

use serde::{Deserialize, Serialize};

/// Travel-advisor persona given to the answer engine
pub const DEFAULT_PREAMBLE: &str =
    "あなたは親切な旅行アドバイザーです。旅行の準備について、詳細で分かりやすい回答を生成してください。";

/// Answer model used by the engine
pub const DEFAULT_MODEL_VERSION: &str = "gemini-1.5-flash-001/answer_gen/v2";

/// Query classification types requested for signal
pub const CLASSIFICATION_TYPES: [&str; 2] = ["ADVERSARIAL_QUERY", "NON_ANSWER_SEEKING_QUERY"];

/// How the engine should understand the query and generate its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSpec {
    /// Answer language (BCP-47)
    pub language_code: String,
    /// System preamble
    pub preamble: String,
    /// Answer model version
    pub model_version: String,
    /// Maximum query rephrase steps
    pub max_rephrase_steps: u32,
    /// Ask for citations in the answer
    pub include_citations: bool,
}

impl Default for AnswerSpec {
    fn default() -> Self {
        Self {
            language_code: "ja".to_string(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            max_rephrase_steps: 1,
            include_citations: true,
        }
    }
}

impl AnswerSpec {
    /// Same spec with a different answer language
    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }
}
