use std::collections::HashMap;
use tracing::{debug, info};

use crate::results::MatchRecord;

/// Default bound on the number of cached queries
pub const DEFAULT_MAX_ENTRIES: usize = 2048;

/// Maps query strings to their previously aggregated, ordered results.
///
/// Keys are the exact text the user typed, case-sensitive. The cache is a
/// plain owned value held by the session controller; the controller's
/// one-search-at-a-time sequencing is what makes unsynchronized access
/// sound. Overflow handling is a blunt full wipe, not per-entry eviction.
#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<String, Vec<MatchRecord>>,
    max_entries: usize,
}

impl ResultCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
        }
    }

    /// Returns the cached, ordered result list for an exact query string
    pub fn lookup(&self, query: &str) -> Option<&[MatchRecord]> {
        self.entries.get(query).map(Vec::as_slice)
    }

    /// Inserts or overwrites the entry for a query.
    ///
    /// When the cache already holds more than `max_entries` queries, every
    /// entry is dropped first and the new one is stored alone.
    pub fn store(&mut self, query: impl Into<String>, records: Vec<MatchRecord>) {
        if self.entries.len() > self.max_entries {
            info!(
                "Result cache exceeded {} entries, clearing before store",
                self.max_entries
            );
            self.entries.clear();
        }
        let query = query.into();
        debug!("Caching {} records for query {:?}", records.len(), query);
        self.entries.insert(query, records);
    }

    /// Drops every cached entry; called whenever the root directory changes
    pub fn invalidate_all(&mut self) {
        debug!("Invalidating {} cached queries", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, line: usize) -> MatchRecord {
        MatchRecord::new(path, line, "text")
    }

    #[test]
    fn test_lookup_returns_stored_order() {
        let mut cache = ResultCache::new(8);
        let records = vec![record("a.txt", 1), record("bb.txt", 2), record("a.txt", 3)];
        cache.store("query", records.clone());

        let cached = cache.lookup("query").unwrap();
        assert_eq!(cached, records.as_slice());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut cache = ResultCache::new(8);
        cache.store("Hello", vec![record("a.txt", 1)]);
        assert!(cache.lookup("Hello").is_some());
        assert!(cache.lookup("hello").is_none());
    }

    #[test]
    fn test_store_overwrites() {
        let mut cache = ResultCache::new(8);
        cache.store("q", vec![record("old.txt", 1)]);
        cache.store("q", vec![record("new.txt", 2)]);

        let cached = cache.lookup("q").unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].path, std::path::PathBuf::from("new.txt"));
    }

    #[test]
    fn test_overflow_wipes_to_single_entry() {
        let mut cache = ResultCache::new(3);
        for i in 0..4 {
            cache.store(format!("query-{}", i), vec![record("f.txt", i)]);
        }
        assert_eq!(cache.len(), 4);

        // len() > max_entries now, so the next store clears first
        cache.store("newest", vec![record("g.txt", 9)]);
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup("newest").is_some());
        assert!(cache.lookup("query-0").is_none());
    }

    #[test]
    fn test_invalidate_all() {
        let mut cache = ResultCache::new(8);
        cache.store("one", vec![record("a.txt", 1)]);
        cache.store("two", vec![record("b.txt", 2)]);
        assert_eq!(cache.len(), 2);

        cache.invalidate_all();
        assert!(cache.is_empty());
        assert!(cache.lookup("one").is_none());
    }

    #[test]
    fn test_empty_result_lists_are_cached_too() {
        let mut cache = ResultCache::new(8);
        cache.store("nothing", Vec::new());
        assert_eq!(cache.lookup("nothing"), Some(&[][..]));
    }
}
