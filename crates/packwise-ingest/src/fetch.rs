//! Page fetchers

use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Desktop browser User-Agent; many travel sites refuse obvious bots
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fetches a page body by URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed fetcher with a bounded timeout and browser User-Agent
pub struct HttpPageFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpPageFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Communication(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Communication(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        response.text().await.map_err(|e| FetchError::Body(e.to_string()))
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Page(String),
    Fail(FetchError),
    Slow(String, Duration),
}

/// Scripted fetcher for tests and offline runs
///
/// Unknown URLs fail with `HTTP 404`.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: Arc<Mutex<HashMap<String, Scripted>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    /// Create a fetcher with no pages
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self, url: impl Into<String>, entry: Scripted) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), entry);
    }

    /// Serve `body` for `url`
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.script(url, Scripted::Page(body.into()));
        self
    }

    /// Fail every fetch of `url` with `error`
    pub fn with_failure(self, url: impl Into<String>, error: FetchError) -> Self {
        self.script(url, Scripted::Fail(error));
        self
    }

    /// Serve `body` for `url` after `delay`
    pub fn with_slow_page(self, url: impl Into<String>, body: impl Into<String>, delay: Duration) -> Self {
        self.script(url, Scripted::Slow(body.into(), delay));
        self
    }

    /// URLs requested so far, in order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let entry = self
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned();

        match entry {
            Some(Scripted::Page(body)) => Ok(body),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Slow(body, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            None => Err(FetchError::Http(404)),
        }
    }
}
