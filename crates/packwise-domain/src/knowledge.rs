//! Knowledge key (cache addressing for ingested source pages)

use std::fmt;

/// Default object-name root for cached source pages
pub const DEFAULT_CACHE_ROOT: &str = "html";

/// Normalized destination used to address cached source pages
///
/// Whitespace becomes `_`; case is preserved, so `New York` and `new york`
/// are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KnowledgeKey(String);

impl KnowledgeKey {
    /// Normalize a destination into a key
    pub fn new(destination: &str) -> Self {
        let normalized = destination
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        Self(normalized)
    }

    /// Get key as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Listing prefix for every page cached under this key
    ///
    /// Always ends with `/` so that `Rome` does not match `Rome_Italy`.
    pub fn prefix(&self, root: &str) -> String {
        format!("{}/{}/", root.trim_end_matches('/'), self.0)
    }

    /// Object name for the page at `index` (zero-based) in search-result order
    pub fn source_object(&self, root: &str, index: usize) -> String {
        format!("{}source_{}.html", self.prefix(root), index + 1)
    }
}

impl fmt::Display for KnowledgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_replaced() {
        let key = KnowledgeKey::new("New York");
        assert_eq!(key.as_str(), "New_York");

        let key = KnowledgeKey::new("Rio\tde Janeiro");
        assert_eq!(key.as_str(), "Rio_de_Janeiro");
    }

    #[test]
    fn test_case_preserved() {
        assert_ne!(KnowledgeKey::new("Paris"), KnowledgeKey::new("paris"));
    }

    #[test]
    fn test_prefix() {
        let key = KnowledgeKey::new("New York");
        assert_eq!(key.prefix(DEFAULT_CACHE_ROOT), "html/New_York/");
        assert_eq!(key.prefix("html/"), "html/New_York/");
    }

    #[test]
    fn test_source_object_is_one_based() {
        let key = KnowledgeKey::new("ハワイ");
        assert_eq!(key.source_object("html", 0), "html/ハワイ/source_1.html");
        assert_eq!(key.source_object("html", 4), "html/ハワイ/source_5.html");
    }
}
