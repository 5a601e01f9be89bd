//! Packwise Answer Engine Client
//!
//! Asks a managed conversational answer engine what to prepare for a trip
//! and returns its synthesized answer with citations.
//!
//! # Engines
//!
//! - `DiscoveryEngineClient`: Discovery Engine `servingConfigs.answer`
//! - `MockAnswerEngine`: scripted answers for testing
//!
//! # Examples
//!
//! ```
//! use packwise_answer::{AnswerClient, MockAnswerEngine};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), packwise_answer::AnswerError> {
//! let engine = MockAnswerEngine::answering("Pack light clothes and sunscreen.");
//! let client = AnswerClient::new(Arc::new(engine));
//! let answer = client.ask("Hawaii").await?;
//! assert!(!answer.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
pub mod discovery;
mod mock;
mod spec;

use async_trait::async_trait;
use packwise_domain::AnswerResult;
use thiserror::Error;

pub use client::{question_for, AnswerClient};
pub use discovery::DiscoveryEngineClient;
pub use mock::MockAnswerEngine;
pub use spec::AnswerSpec;

/// Errors that can occur while querying the answer engine
#[derive(Error, Debug, Clone)]
pub enum AnswerError {
    /// Network, transport or HTTP failure
    #[error("Answer engine error: {0}")]
    Engine(String),

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A managed question-answering service grounded on a document store
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    /// Answer a natural-language question
    ///
    /// An empty answer text is a valid result, not an error.
    async fn answer(&self, question: &str) -> Result<AnswerResult, AnswerError>;
}
