//! Request orchestration

use crate::error::PipelineError;
use crate::locks::IngestionLocks;
use packwise_answer::AnswerClient;
use packwise_domain::{KnowledgeKey, PackingListResult, TripRequest};
use packwise_ingest::Ingestor;
use packwise_store::CacheProbe;
use packwise_synthesizer::Synthesizer;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};

/// Default end-to-end budget for one request (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Runs cache probe, ingestion, answer and synthesis for one trip
///
/// Cheap to clone; clones share the ingestion lock table.
#[derive(Clone)]
pub struct Pipeline {
    probe: CacheProbe,
    ingestor: Arc<Ingestor>,
    answers: AnswerClient,
    synthesizer: Synthesizer,
    locks: IngestionLocks,
    request_timeout: Duration,
}

impl Pipeline {
    /// Assemble a pipeline from its four steps
    pub fn new(
        probe: CacheProbe,
        ingestor: Ingestor,
        answers: AnswerClient,
        synthesizer: Synthesizer,
    ) -> Self {
        Self {
            probe,
            ingestor: Arc::new(ingestor),
            answers,
            synthesizer,
            locks: IngestionLocks::new(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Set the end-to-end deadline
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// End-to-end deadline
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Ingestion lock table
    pub fn locks(&self) -> &IngestionLocks {
        &self.locks
    }

    /// Produce a packing list for `request`
    ///
    /// # Errors
    ///
    /// See [`PipelineError`]. Expiry of the request deadline cancels
    /// whichever step is in flight and returns
    /// [`PipelineError::DeadlineExceeded`].
    #[instrument(
        skip_all,
        fields(destination = %request.destination(), days = request.days())
    )]
    pub async fn run(&self, request: &TripRequest) -> Result<PackingListResult, PipelineError> {
        let outcome = match timeout(self.request_timeout, self.execute(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(PipelineError::DeadlineExceeded(self.request_timeout.as_secs())),
        };

        match &outcome {
            Ok(list) => info!(items = list.items.len(), "packing list ready"),
            Err(e) if e.is_client_error() => warn!(error = %e, "request failed"),
            Err(e) => error!(error = %e, status = e.status_code(), "request failed"),
        }
        outcome
    }

    async fn execute(&self, request: &TripRequest) -> Result<PackingListResult, PipelineError> {
        let destination = request.destination();

        self.ensure_knowledge(destination).await?;

        info!("asking answer engine");
        let answer = self.answers.ask(destination).await?;
        if answer.is_empty() {
            return Err(PipelineError::NoAnswerGenerated(destination.to_string()));
        }

        info!("synthesizing packing list");
        let list = self
            .synthesizer
            .synthesize(&answer.answer_text, destination, request.days())
            .await?;
        Ok(list)
    }

    /// Ingest `destination` unless cached pages already exist
    async fn ensure_knowledge(&self, destination: &str) -> Result<(), PipelineError> {
        if self.probe.exists(destination).await? {
            info!("knowledge cache hit");
            return Ok(());
        }

        let key = KnowledgeKey::new(destination);
        let _guard = self.locks.acquire(&key).await;

        // Another request may have ingested while we waited
        if self.probe.exists(destination).await? {
            info!("knowledge cached by a concurrent request");
            return Ok(());
        }

        let report = self.ingestor.ingest(destination).await?;
        if report.stored() == 0 {
            warn!(summary = %report.summary(), "ingestion stored no pages");
        } else {
            info!(summary = %report.summary(), "ingestion complete");
        }
        info!("answer engine indexing of new pages may lag; not waiting");
        Ok(())
    }
}
