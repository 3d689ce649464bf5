//! Per-scan shared state: outcomes and the vulnerable-URL set.

use std::collections::HashSet;

/// Result of probing one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Response body contained the marker verbatim.
    Vulnerable,
    NotVulnerable,
    /// Transport failure; the URL is not retried.
    FetchError,
}

/// Deduplicated, insertion-ordered set of URLs that reflected the marker.
/// Lives for one domain's scan and only grows.
#[derive(Debug, Clone, Default)]
pub struct VulnerableSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl VulnerableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `url` if absent. Returns true only for the first insertion,
    /// so the caller writes the URL to its sink exactly once.
    pub fn insert_new(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());
        self.order.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_new_only_once() {
        let mut set = VulnerableSet::new();
        assert!(set.insert_new("http://a.com/x?id=1"));
        assert!(!set.insert_new("http://a.com/x?id=1"));
        assert!(set.insert_new("http://a.com/y?id=1"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("http://a.com/y?id=1"));
    }

    #[test]
    fn keeps_insertion_order() {
        let mut set = VulnerableSet::new();
        set.insert_new("b");
        set.insert_new("a");
        set.insert_new("b");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.into_vec(), vec!["b".to_string(), "a".to_string()]);
    }
}
