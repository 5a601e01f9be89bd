//! Web search providers

use crate::config::MAX_SEARCH_RESULTS;
use crate::error::SearchError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default Custom Search API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com";

/// Default timeout for search requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keyword web search returning result links
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Return up to `max_results` result URLs for `query`, best first
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, SearchError>;
}

/// Google Programmable Search (Custom Search JSON API) client
pub struct CustomSearchClient {
    endpoint: String,
    api_key: String,
    engine_id: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    // Omitted when there are no results
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
}

impl CustomSearchClient {
    /// Create a client with an API key and search engine id (`cx`)
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SearchError::Communication(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            client,
        })
    }

    /// Point at a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl WebSearch for CustomSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        let url = format!("{}/customsearch/v1", self.endpoint);
        let num = max_results.clamp(1, MAX_SEARCH_RESULTS).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(parsed
            .items
            .into_iter()
            .map(|item| item.link)
            .take(max_results)
            .collect())
    }
}

/// Scripted search provider for tests and offline runs
#[derive(Debug, Clone)]
pub struct StaticSearch {
    outcome: Result<Vec<String>, SearchError>,
    calls: Arc<AtomicUsize>,
}

impl StaticSearch {
    /// Always return `links`
    pub fn with_links<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outcome: Ok(links.into_iter().map(Into::into).collect()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always return no links
    pub fn empty() -> Self {
        Self::with_links(Vec::<String>::new())
    }

    /// Always fail with `error`
    pub fn failing(error: SearchError) -> Self {
        Self {
            outcome: Err(error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of searches performed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for StaticSearch {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .clone()
            .map(|links| links.into_iter().take(max_results).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CustomSearchClient {
        CustomSearchClient::new("api-key", "engine-cx")
            .unwrap()
            .with_endpoint(server.uri())
    }

    #[tokio::test]
    async fn test_search_returns_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("key", "api-key"))
            .and(query_param("cx", "engine-cx"))
            .and(query_param("q", "Hawaii 旅行 持ち物 リスト"))
            .and(query_param("num", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "link": "https://a.example/hawaii", "title": "A" },
                    { "link": "https://b.example/hawaii", "title": "B" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let links = client_for(&server)
            .search("Hawaii 旅行 持ち物 リスト", 5)
            .await
            .unwrap();
        assert_eq!(links, vec!["https://a.example/hawaii", "https://b.example/hawaii"]);
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchInformation": { "totalResults": "0" }
            })))
            .mount(&server)
            .await;

        let links = client_for(&server).search("nowhere", 5).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_num_capped_at_provider_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("num", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).search("q", 50).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let result = client_for(&server).search("q", 5).await;
        assert!(matches!(result, Err(SearchError::Http { status: 429, .. })));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).search("q", 5).await;
        assert!(matches!(result, Err(SearchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_static_search_truncates_and_counts() {
        let search = StaticSearch::with_links(["a", "b", "c"]);
        assert_eq!(search.search("q", 2).await.unwrap(), vec!["a", "b"]);
        assert_eq!(search.call_count(), 1);
    }
}
