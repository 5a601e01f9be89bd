//! Destination-level answer client

use crate::{AnswerEngine, AnswerError};
use packwise_domain::AnswerResult;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Question sent for a destination
///
/// ("Please tell me in detail what to bring and prepare for a trip to X")
pub fn question_for(destination: &str) -> String {
    format!(
        "「{}」への旅行に必要な持ち物や準備について、詳しく教えてください",
        destination
    )
}

/// Turns a destination into a question and asks the engine
#[derive(Clone)]
pub struct AnswerClient {
    engine: Arc<dyn AnswerEngine>,
}

impl AnswerClient {
    /// Create a client over `engine`
    pub fn new(engine: Arc<dyn AnswerEngine>) -> Self {
        Self { engine }
    }

    /// Ask what to pack for `destination`
    #[instrument(skip_all, fields(destination = %destination))]
    pub async fn ask(&self, destination: &str) -> Result<AnswerResult, AnswerError> {
        let question = question_for(destination);
        match self.engine.answer(&question).await {
            Ok(answer) => {
                let flagged: Vec<&str> = answer
                    .classifications
                    .iter()
                    .filter(|c| c.positive)
                    .map(|c| c.kind.as_str())
                    .collect();
                info!(
                    chars = answer.answer_text.chars().count(),
                    citations = answer.citation_count(),
                    ?flagged,
                    "received answer"
                );
                Ok(answer)
            }
            Err(e) => {
                error!(error = %e, "answer engine query failed");
                Err(e)
            }
        }
    }
}
