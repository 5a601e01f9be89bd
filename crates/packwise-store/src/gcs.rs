//! Cloud Storage backend
//!
//! Talks to the Cloud Storage JSON API directly:
//!
//! - list: `GET {endpoint}/storage/v1/b/{bucket}/o?prefix=..&maxResults=..`
//! - write: `POST {endpoint}/upload/storage/v1/b/{bucket}/o?uploadType=media&name=..`
//!
//! Credentials are out of scope here; when an access token is configured it
//! is sent as a bearer token, otherwise requests go out unauthenticated
//! (suitable for emulators and tests).

use crate::{ObjectStore, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Default Cloud Storage API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Default timeout for storage requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Cloud Storage bucket accessed over the JSON API
pub struct GcsStore {
    endpoint: String,
    bucket: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ListObjectsResponse {
    // Omitted entirely when nothing matches
    #[serde(default)]
    items: Vec<ObjectResource>,
}

#[derive(Deserialize)]
struct ObjectResource {
    name: String,
}

impl GcsStore {
    /// Create a store for `bucket` against the public endpoint
    pub fn new(bucket: impl Into<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Communication(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket: bucket.into(),
            access_token: None,
            client,
        })
    }

    /// Point at a different API endpoint (emulator or test server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Send `token` as a bearer token on every request
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(StoreError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn list_prefix(&self, prefix: &str, max_results: usize) -> Result<Vec<String>, StoreError> {
        let url = format!("{}/storage/v1/b/{}/o", self.endpoint, self.bucket);
        let max_results_param = max_results.to_string();
        let request = self
            .client
            .get(&url)
            .query(&[("prefix", prefix), ("maxResults", max_results_param.as_str())]);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;
        let response = Self::check(response).await?;

        let listing = response
            .json::<ListObjectsResponse>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse listing: {}", e)))?;

        Ok(listing
            .items
            .into_iter()
            .take(max_results)
            .map(|o| o.name)
            .collect())
    }

    async fn put(&self, name: &str, body: String, content_type: &str) -> Result<(), StoreError> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.endpoint, self.bucket);
        let request = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", name)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;
        Self::check(response).await?;
        Ok(())
    }
}
