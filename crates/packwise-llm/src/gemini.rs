//! Gemini Provider Implementation
//!
//! Calls the Vertex AI `generateContent` endpoint:
//!
//! `{endpoint}/v1/projects/{project}/locations/{region}/publishers/google/models/{model}:generateContent`
//!
//! # Features
//!
//! - Single non-streaming request per prompt
//! - Configurable endpoint, region and model
//! - Timeout handling (no retries; a failed call fails the request)
//!
//! # Examples
//!
//! ```no_run
//! use packwise_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("my-project", "us-central1", "gemini-2.0-flash-001").unwrap();
//! ```

use crate::{LlmError, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Vertex AI Gemini provider
pub struct GeminiProvider {
    endpoint: String,
    project: String,
    region: String,
    model: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

/// Request body for generateContent
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

/// Response from generateContent
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `project`: GCP project id
    /// - `region`: Vertex AI region (e.g., "us-central1")
    /// - `model`: Model to use (e.g., "gemini-2.0-flash-001")
    pub fn new(
        project: impl Into<String>,
        region: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let region = region.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: format!("https://{}-aiplatform.googleapis.com", region),
            project: project.into(),
            region,
            model: model.into(),
            access_token: None,
            client,
        })
    }

    /// Point at a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Send `token` as a bearer token on every request
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Communication(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.endpoint, self.project, self.region, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: prompt }],
            }],
        };

        let mut request = self.client.post(self.url()).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            let reason = parsed
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(LlmError::Blocked(reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::Blocked(
                candidate.finish_reason.unwrap_or_else(|| "empty candidate".to_string()),
            ));
        }

        debug!(model = %self.model, chars = text.len(), "generation complete");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str =
        "/v1/projects/proj/locations/us-central1/publishers/google/models/gemini-2.0-flash-001:generateContent";

    fn provider_for(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new("proj", "us-central1", DEFAULT_MODEL)
            .unwrap()
            .with_endpoint(server.uri())
    }

    #[test]
    fn test_default_endpoint_uses_region() {
        let provider = GeminiProvider::new("proj", "asia-northeast1", DEFAULT_MODEL).unwrap();
        assert_eq!(provider.endpoint, "https://asia-northeast1-aiplatform.googleapis.com");
        assert_eq!(provider.model_name(), DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_generate_joins_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "list please" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "{\"packing_list\":" }, { "text": "[]}" }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider_for(&server).generate("list please").await.unwrap();
        assert_eq!(text, "{\"packing_list\":[]}");
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let result = provider_for(&server).generate("x").await;
        assert!(matches!(result, Err(LlmError::Blocked(r)) if r == "SAFETY"));
    }

    #[tokio::test]
    async fn test_empty_candidate_is_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "MAX_TOKENS" }]
            })))
            .mount(&server)
            .await;

        let result = provider_for(&server).generate("x").await;
        assert!(matches!(result, Err(LlmError::Blocked(r)) if r == "MAX_TOKENS"));
    }

    #[tokio::test]
    async fn test_model_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = provider_for(&server).generate("x").await;
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider_for(&server).generate("x").await;
        match result {
            Err(LlmError::Communication(msg)) => assert!(msg.contains("overloaded")),
            other => panic!("Expected Communication error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_error_handling_unreachable() {
        let provider = GeminiProvider::new("proj", "us-central1", DEFAULT_MODEL)
            .unwrap()
            .with_endpoint("http://127.0.0.1:9");

        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
