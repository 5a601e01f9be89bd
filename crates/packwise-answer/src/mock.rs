//! Scripted answer engine

use crate::{AnswerEngine, AnswerError};
use async_trait::async_trait;
use packwise_domain::AnswerResult;
use std::sync::{Arc, Mutex, PoisonError};

/// Answer engine returning a fixed result
///
/// Clones share the question log.
#[derive(Debug, Clone)]
pub struct MockAnswerEngine {
    outcome: Result<AnswerResult, AnswerError>,
    questions: Arc<Mutex<Vec<String>>>,
}

impl MockAnswerEngine {
    /// Always answer with `result`
    pub fn new(result: AnswerResult) -> Self {
        Self {
            outcome: Ok(result),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer with plain `text`
    pub fn answering(text: impl Into<String>) -> Self {
        Self::new(AnswerResult::from_text(text))
    }

    /// Always fail with an engine error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(AnswerError::Engine(message.into())),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Questions received so far
    pub fn questions(&self) -> Vec<String> {
        self.questions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of questions received
    pub fn call_count(&self) -> usize {
        self.questions().len()
    }
}

#[async_trait]
impl AnswerEngine for MockAnswerEngine {
    async fn answer(&self, question: &str) -> Result<AnswerResult, AnswerError> {
        self.questions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(question.to_string());
        self.outcome.clone()
    }
}
