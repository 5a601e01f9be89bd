//! Ingestion report: what happened to each search result

use std::fmt;

/// Why a page was not stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The page could not be fetched
    PageFetch(String),
    /// The page was fetched but writing it to the store failed
    StorageWrite(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PageFetch(msg) => write!(f, "page fetch failed: {}", msg),
            SkipReason::StorageWrite(msg) => write!(f, "storage write failed: {}", msg),
        }
    }
}

/// Result for one search-result link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page body persisted under `object`
    Stored {
        /// Source URL
        url: String,
        /// Object name written
        object: String,
    },
    /// Page skipped
    Skipped {
        /// Source URL
        url: String,
        /// Cause
        reason: SkipReason,
    },
}

impl PageOutcome {
    /// Source URL
    pub fn url(&self) -> &str {
        match self {
            PageOutcome::Stored { url, .. } | PageOutcome::Skipped { url, .. } => url,
        }
    }

    /// True if the page was persisted
    pub fn is_stored(&self) -> bool {
        matches!(self, PageOutcome::Stored { .. })
    }
}

/// Summary of one ingestion pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    /// Destination ingested
    pub destination: String,
    /// Query sent to the search provider
    pub query: String,
    /// One outcome per link, in search-result order
    pub outcomes: Vec<PageOutcome>,
}

impl IngestionReport {
    /// Number of links processed
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of pages persisted
    pub fn stored(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_stored()).count()
    }

    /// Number of pages skipped
    pub fn skipped(&self) -> usize {
        self.attempted() - self.stored()
    }

    /// Skipped pages with their reasons
    pub fn skips(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            PageOutcome::Skipped { url, reason } => Some((url.as_str(), reason)),
            PageOutcome::Stored { .. } => None,
        })
    }

    /// Human-readable one-liner, e.g. `4 of 5 pages stored`
    pub fn summary(&self) -> String {
        format!("{} of {} pages stored", self.stored(), self.attempted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_summary() {
        let report = IngestionReport {
            destination: "Hawaii".to_string(),
            query: "Hawaii 旅行 持ち物 リスト".to_string(),
            outcomes: vec![
                PageOutcome::Stored {
                    url: "https://a".to_string(),
                    object: "html/Hawaii/source_1.html".to_string(),
                },
                PageOutcome::Skipped {
                    url: "https://b".to_string(),
                    reason: SkipReason::PageFetch("HTTP 500".to_string()),
                },
                PageOutcome::Skipped {
                    url: "https://c".to_string(),
                    reason: SkipReason::StorageWrite("denied".to_string()),
                },
            ],
        };

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.stored(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.summary(), "1 of 3 pages stored");

        let skipped: Vec<_> = report.skips().map(|(url, _)| url).collect();
        assert_eq!(skipped, vec!["https://b", "https://c"]);
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::StorageWrite("quota".to_string());
        assert_eq!(reason.to_string(), "storage write failed: quota");
    }
}
