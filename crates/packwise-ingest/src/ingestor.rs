//! Core Ingestor implementation

use crate::config::IngestConfig;
use crate::error::{FetchError, IngestError};
use crate::fetch::PageFetcher;
use crate::report::{IngestionReport, PageOutcome, SkipReason};
use crate::search::WebSearch;
use packwise_domain::KnowledgeKey;
use packwise_store::ObjectStore;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// MIME type recorded on cached pages
pub const PAGE_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Searches the web for a destination and caches the result pages
#[derive(Clone)]
pub struct Ingestor {
    search: Arc<dyn WebSearch>,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ObjectStore>,
    config: IngestConfig,
}

impl Ingestor {
    /// Create a new Ingestor
    pub fn new(
        search: Arc<dyn WebSearch>,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn ObjectStore>,
        config: IngestConfig,
    ) -> Self {
        Self {
            search,
            fetcher,
            store,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Search query for a destination
    pub fn search_query(&self, destination: &str) -> String {
        format!("{} {}", destination, self.config.search_keywords)
    }

    /// Search, fetch and persist pages for `destination`
    ///
    /// # Errors
    ///
    /// Fails only if the search call fails or returns no links. Per-page
    /// fetch and write failures are recorded in the report instead.
    #[instrument(skip_all, fields(destination = %destination))]
    pub async fn ingest(&self, destination: &str) -> Result<IngestionReport, IngestError> {
        let query = self.search_query(destination);
        info!(%query, "knowledge cache miss, searching the web");

        let links = match self.search.search(&query, self.config.max_results).await {
            Ok(links) => links,
            Err(e) => {
                error!(error = %e, "web search failed");
                return Err(IngestError::SearchProvider(e));
            }
        };

        if links.is_empty() {
            warn!(%query, "web search returned no results");
            return Err(IngestError::NoSearchResults { query });
        }

        let key = KnowledgeKey::new(destination);
        let mut outcomes = Vec::with_capacity(links.len());

        for (index, url) in links.into_iter().enumerate() {
            let object = key.source_object(&self.config.cache_root, index);
            let outcome = self.ingest_page(url, object).await;
            if let PageOutcome::Skipped { url, reason } = &outcome {
                warn!(%url, %reason, "skipping page");
            }
            outcomes.push(outcome);
        }

        let report = IngestionReport {
            destination: destination.to_string(),
            query,
            outcomes,
        };
        info!(summary = %report.summary(), "ingestion finished");
        Ok(report)
    }

    async fn ingest_page(&self, url: String, object: String) -> PageOutcome {
        let budget = self.config.fetch_timeout();
        let body = match timeout(budget, self.fetcher.fetch(&url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return skipped(url, SkipReason::PageFetch(e.to_string())),
            Err(_) => {
                let e = FetchError::Timeout(self.config.fetch_timeout_secs);
                return skipped(url, SkipReason::PageFetch(e.to_string()));
            }
        };

        debug!(%url, bytes = body.len(), "fetched page");

        match self.store.put(&object, body, PAGE_CONTENT_TYPE).await {
            Ok(()) => {
                info!(%url, %object, "saved page");
                PageOutcome::Stored { url, object }
            }
            Err(e) => skipped(url, SkipReason::StorageWrite(e.to_string())),
        }
    }
}

fn skipped(url: String, reason: SkipReason) -> PageOutcome {
    PageOutcome::Skipped { url, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::fetch::StaticFetcher;
    use crate::search::StaticSearch;
    use packwise_store::MemoryStore;
    use std::time::Duration;

    const LINKS: [&str; 5] = [
        "https://one.example/hawaii",
        "https://two.example/hawaii",
        "https://three.example/hawaii",
        "https://four.example/hawaii",
        "https://five.example/hawaii",
    ];

    fn all_pages() -> StaticFetcher {
        LINKS
            .iter()
            .enumerate()
            .fold(StaticFetcher::new(), |f, (i, url)| f.with_page(*url, format!("<p>page {}</p>", i + 1)))
    }

    fn ingestor(search: StaticSearch, fetcher: StaticFetcher, store: MemoryStore) -> Ingestor {
        Ingestor::new(
            Arc::new(search),
            Arc::new(fetcher),
            Arc::new(store),
            IngestConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_ingest_stores_every_page() {
        let store = MemoryStore::new();
        let ingestor = ingestor(StaticSearch::with_links(LINKS), all_pages(), store.clone());

        let report = ingestor.ingest("Hawaii").await.unwrap();
        assert_eq!(report.stored(), 5);
        assert_eq!(report.query, "Hawaii 旅行 持ち物 リスト");

        let page = store.get("html/Hawaii/source_3.html").unwrap();
        assert_eq!(page.body, "<p>page 3</p>");
        assert_eq!(page.content_type, PAGE_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_one_failed_fetch_is_skipped() {
        let store = MemoryStore::new();
        let fetcher = all_pages().with_failure(
            LINKS[1],
            FetchError::Communication("connection reset".to_string()),
        );
        let ingestor = ingestor(StaticSearch::with_links(LINKS), fetcher, store.clone());

        let report = ingestor.ingest("Hawaii").await.unwrap();
        assert_eq!(report.attempted(), 5);
        assert_eq!(report.stored(), 4);
        assert_eq!(report.summary(), "4 of 5 pages stored");
        assert_eq!(store.len(), 4);
        assert!(store.get("html/Hawaii/source_2.html").is_none());

        let (url, reason) = report.skips().next().unwrap();
        assert_eq!(url, LINKS[1]);
        assert!(matches!(reason, SkipReason::PageFetch(_)));
    }

    #[tokio::test]
    async fn test_write_failure_does_not_stop_remaining_pages() {
        let store = MemoryStore::new();
        store.reject_writes_to("html/Hawaii/source_1.html");
        let ingestor = ingestor(StaticSearch::with_links(LINKS), all_pages(), store.clone());

        let report = ingestor.ingest("Hawaii").await.unwrap();
        assert_eq!(report.stored(), 4);
        assert!(matches!(report.outcomes[0], PageOutcome::Skipped { reason: SkipReason::StorageWrite(_), .. }));
        assert!(store.get("html/Hawaii/source_5.html").is_some());
    }

    #[tokio::test]
    async fn test_slow_page_is_skipped_after_timeout() {
        let store = MemoryStore::new();
        let fetcher = all_pages().with_slow_page(LINKS[0], "late", Duration::from_secs(30));
        let mut config = IngestConfig::default();
        config.fetch_timeout_secs = 1;
        let ingestor = Ingestor::new(
            Arc::new(StaticSearch::with_links(LINKS)),
            Arc::new(fetcher),
            Arc::new(store.clone()),
            config,
        );

        tokio::time::pause();
        let report = ingestor.ingest("Hawaii").await.unwrap();
        assert_eq!(report.stored(), 4);
        match &report.outcomes[0] {
            PageOutcome::Skipped { reason: SkipReason::PageFetch(msg), .. } => {
                assert!(msg.contains("Timed out"));
            }
            other => panic!("Expected timeout skip, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_results() {
        let store = MemoryStore::new();
        let fetcher = StaticFetcher::new();
        let ingestor = ingestor(StaticSearch::empty(), fetcher.clone(), store.clone());

        let result = ingestor.ingest("Atlantis").await;
        assert!(matches!(result, Err(IngestError::NoSearchResults { .. })));
        assert!(fetcher.fetched().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_search_provider_failure() {
        let search = StaticSearch::failing(SearchError::Http {
            status: 403,
            message: "bad key".to_string(),
        });
        let ingestor = ingestor(search, StaticFetcher::new(), MemoryStore::new());

        let result = ingestor.ingest("Hawaii").await;
        assert!(matches!(result, Err(IngestError::SearchProvider(_))));
    }

    #[tokio::test]
    async fn test_reingest_overwrites_same_keys() {
        let store = MemoryStore::new();
        let ingestor = ingestor(StaticSearch::with_links(LINKS), all_pages(), store.clone());

        ingestor.ingest("New York").await.unwrap();
        ingestor.ingest("New York").await.unwrap();
        assert_eq!(store.len(), 5);
        assert!(store.names().iter().all(|n| n.starts_with("html/New_York/")));
    }
}
