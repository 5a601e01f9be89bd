//! Packwise List Synthesizer
//!
//! Turns an answer-engine summary and a trip length into a structured,
//! quantity-adjusted packing list using a generative model.
//!
//! # Architecture
//!
//! ```text
//! summary + days → PromptBuilder → TextGenerator → JsonExtractor → parser → PackingListResult
//! ```
//!
//! Model output is free text. The JSON object is cut out of it by a
//! [`JsonExtractor`] (first `{` through last `}` by default), parsed, and each
//! quantity is coerced to a positive integer. Anything that does not fit
//! fails with [`SynthesisError::MalformedOutput`].
//!
//! # Example Usage
//!
//! ```
//! use packwise_llm::MockProvider;
//! use packwise_synthesizer::{Synthesizer, SynthesizerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), packwise_synthesizer::SynthesisError> {
//! let llm = MockProvider::new(r#"{"packing_list":[{"item":"Tシャツ","quantity":"3"}]}"#);
//! let synthesizer = Synthesizer::new(Arc::new(llm), SynthesizerConfig::default());
//!
//! let result = synthesizer.synthesize("Warm all year.", "Hawaii", 3).await?;
//! assert_eq!(result.items[0].quantity, 3);
//! assert_eq!(result.summary, "Warm all year.");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extraction;
mod parser;
mod prompt;
mod synthesizer;

pub use config::SynthesizerConfig;
pub use error::{ExtractError, SynthesisError};
pub use extraction::{BraceSpanExtractor, FencedBlockExtractor, JsonExtractor};
pub use parser::{coerce_quantity, parse_packing_list};
pub use prompt::PromptBuilder;
pub use synthesizer::Synthesizer;
