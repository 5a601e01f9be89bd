//! Discovery Engine answer client
//!
//! Calls `servingConfigs.answer` on the engine's default serving config:
//!
//! `{endpoint}/v1/projects/{project}/locations/{location}/collections/default_collection/engines/{engine}/servingConfigs/default_serving_config:answer`
//!
//! The `global` location uses the bare `discoveryengine.googleapis.com` host;
//! multi-region locations (`us`, `eu`) use a prefixed host.

use crate::spec::{AnswerSpec, CLASSIFICATION_TYPES};
use crate::{AnswerEngine, AnswerError};
use async_trait::async_trait;
use packwise_domain::{AnswerResult, QueryClassification};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default timeout for answer requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// API host for an engine location
pub fn endpoint_for(location: &str) -> String {
    if location == "global" {
        "https://discoveryengine.googleapis.com".to_string()
    } else {
        format!("https://{}-discoveryengine.googleapis.com", location)
    }
}

/// Discovery Engine (Vertex AI Search) conversational answer client
pub struct DiscoveryEngineClient {
    endpoint: String,
    project: String,
    location: String,
    engine_id: String,
    spec: AnswerSpec,
    access_token: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerQueryRequest<'a> {
    query: QueryText<'a>,
    query_understanding_spec: QueryUnderstandingSpec,
    answer_generation_spec: AnswerGenerationSpec<'a>,
}

#[derive(Serialize)]
struct QueryText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryUnderstandingSpec {
    query_rephraser_spec: QueryRephraserSpec,
    query_classification_spec: QueryClassificationSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRephraserSpec {
    disable: bool,
    max_rephrase_steps: u32,
}

#[derive(Serialize)]
struct QueryClassificationSpec {
    types: [&'static str; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerGenerationSpec<'a> {
    model_spec: ModelSpec<'a>,
    prompt_spec: PromptSpec<'a>,
    include_citations: bool,
    answer_language_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelSpec<'a> {
    model_version: &'a str,
}

#[derive(Serialize)]
struct PromptSpec<'a> {
    preamble: &'a str,
}

#[derive(Deserialize)]
struct AnswerQueryResponse {
    #[serde(default)]
    answer: Option<Answer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Answer {
    #[serde(default)]
    answer_text: String,
    #[serde(default)]
    citations: Value,
    #[serde(default)]
    query_understanding_info: Option<QueryUnderstandingInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryUnderstandingInfo {
    #[serde(default)]
    query_classification_info: Vec<ClassificationInfo>,
}

#[derive(Deserialize)]
struct ClassificationInfo {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    positive: bool,
}

impl DiscoveryEngineClient {
    /// Create a client for an engine
    ///
    /// # Parameters
    ///
    /// - `project`: GCP project id
    /// - `location`: engine location (`global`, `us`, `eu`)
    /// - `engine_id`: Discovery Engine app id
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Result<Self, AnswerError> {
        let location = location.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AnswerError::Engine(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint_for(&location),
            project: project.into(),
            location,
            engine_id: engine_id.into(),
            spec: AnswerSpec::default(),
            access_token: None,
            client,
        })
    }

    /// Point at a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the answer generation settings
    pub fn with_spec(mut self, spec: AnswerSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Send `token` as a bearer token on every request
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Serving config resource name
    pub fn serving_config(&self) -> String {
        format!(
            "projects/{}/locations/{}/collections/default_collection/engines/{}/servingConfigs/default_serving_config",
            self.project, self.location, self.engine_id
        )
    }

    fn request_body<'a>(&'a self, question: &'a str) -> AnswerQueryRequest<'a> {
        AnswerQueryRequest {
            query: QueryText { text: question },
            query_understanding_spec: QueryUnderstandingSpec {
                query_rephraser_spec: QueryRephraserSpec {
                    disable: false,
                    max_rephrase_steps: self.spec.max_rephrase_steps,
                },
                query_classification_spec: QueryClassificationSpec {
                    types: CLASSIFICATION_TYPES,
                },
            },
            answer_generation_spec: AnswerGenerationSpec {
                model_spec: ModelSpec {
                    model_version: &self.spec.model_version,
                },
                prompt_spec: PromptSpec {
                    preamble: &self.spec.preamble,
                },
                include_citations: self.spec.include_citations,
                answer_language_code: &self.spec.language_code,
            },
        }
    }
}

#[async_trait]
impl AnswerEngine for DiscoveryEngineClient {
    async fn answer(&self, question: &str) -> Result<AnswerResult, AnswerError> {
        let url = format!("{}/v1/{}:answer", self.endpoint, self.serving_config());

        let mut request = self.client.post(&url).json(&self.request_body(question));
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AnswerError::Engine(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnswerError::Engine(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed = response
            .json::<AnswerQueryResponse>()
            .await
            .map_err(|e| AnswerError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let Some(answer) = parsed.answer else {
            return Ok(AnswerResult::default());
        };

        let classifications = answer
            .query_understanding_info
            .map(|info| {
                info.query_classification_info
                    .into_iter()
                    .map(|c| QueryClassification {
                        kind: c.kind,
                        positive: c.positive,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(AnswerResult {
            answer_text: answer.answer_text,
            citations: answer.citations,
            classifications,
        })
    }
}
