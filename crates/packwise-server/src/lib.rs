//! Packwise Server
//!
//! HTTP front end for the packing-list pipeline. Builds the production
//! clients from [`config::ServerConfig`] and serves the axum router.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use packwise_answer::{AnswerClient, AnswerSpec, DiscoveryEngineClient};
use packwise_ingest::{CustomSearchClient, HttpPageFetcher, Ingestor};
use packwise_llm::GeminiProvider;
use packwise_pipeline::Pipeline;
use packwise_store::{CacheProbe, GcsStore, ObjectStore};
use packwise_synthesizer::Synthesizer;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A provider client could not be constructed
    #[error("Failed to build {service} client: {message}")]
    Client {
        /// Which provider
        service: &'static str,
        /// Underlying error
        message: String,
    },

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

fn client_error(service: &'static str, e: impl std::fmt::Display) -> ServerError {
    ServerError::Client {
        service,
        message: e.to_string(),
    }
}

/// Build the pipeline over the real Google Cloud providers
///
/// Clients are constructed once and shared by every request.
pub fn build_pipeline(config: &ServerConfig) -> Result<Pipeline, ServerError> {
    config.validate()?;
    let token = config.access_token.clone();

    let store: Arc<dyn ObjectStore> = Arc::new(
        GcsStore::new(&config.bucket)
            .map_err(|e| client_error("storage", e))?
            .with_access_token(token.clone()),
    );

    let search = CustomSearchClient::new(&config.search_api_key, &config.search_engine_id)
        .map_err(|e| client_error("search", e))?;
    let fetcher = HttpPageFetcher::new(Duration::from_secs(config.page_fetch_timeout_secs))
        .map_err(|e| client_error("page fetch", e))?;

    let engine = DiscoveryEngineClient::new(
        &config.gcp_project,
        &config.answer_engine_location,
        &config.answer_engine_id,
    )
    .map_err(|e| client_error("answer engine", e))?
    .with_spec(AnswerSpec::default().with_language(&config.answer_language))
    .with_access_token(token.clone());

    let llm = GeminiProvider::new(&config.gcp_project, &config.gcp_region, &config.gemini_model)
        .map_err(|e| client_error("generative model", e))?
        .with_access_token(token);

    let pipeline = Pipeline::new(
        CacheProbe::new(store.clone(), &config.cache_root),
        Ingestor::new(Arc::new(search), Arc::new(fetcher), store, config.ingest_config()),
        AnswerClient::new(Arc::new(engine)),
        Synthesizer::new(Arc::new(llm), config.synthesizer_config()),
    )
    .with_request_timeout(Duration::from_secs(config.request_timeout_secs));

    Ok(pipeline)
}

/// Start the HTTP server
///
/// Builds the provider clients, then binds and serves until the process
/// is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Packwise server");
    info!(
        project = %config.gcp_project,
        bucket = %config.bucket,
        model = %config.gemini_model,
        request_timeout_secs = config.request_timeout_secs,
        "configuration loaded"
    );

    let pipeline = build_pipeline(&config)?;
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
