//! Bounded cache of parsed path expressions.

use indexmap::IndexMap;
use log::trace;

use super::ast::ParsedPath;

/// Number of parsed paths kept by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// A least recently used cache keyed by `(path, separator)`.
///
/// Entries are kept in recency order: the front of the map is the least
/// recently used entry and is evicted first.
#[derive(Debug, Clone)]
pub struct PathCache {
    entries: IndexMap<(String, String), ParsedPath>,
    capacity: usize,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PathCache {
    /// Creates a cache holding at most `capacity` paths. A capacity of zero
    /// disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a path and marks it as most recently used.
    pub fn get(&mut self, path: &str, separator: &str) -> Option<ParsedPath> {
        let key = (path.to_string(), separator.to_string());
        let index = self.entries.get_index_of(&key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        trace!("path cache hit for {:?}", path);
        self.entries.get_index(last).map(|(_, parsed)| parsed.clone())
    }

    /// Stores a parsed path, evicting the least recently used entries once
    /// the capacity is exceeded.
    pub fn insert(&mut self, path: &str, separator: &str, parsed: ParsedPath) {
        if self.capacity == 0 {
            return;
        }

        let key = (path.to_string(), separator.to_string());
        if let Some(index) = self.entries.get_index_of(&key) {
            let last = self.entries.len() - 1;
            self.entries.move_index(index, last);
        }
        self.entries.insert(key, parsed);

        while self.entries.len() > self.capacity {
            if let Some(((evicted, _), _)) = self.entries.shift_remove_index(0) {
                trace!("path cache evicted {:?}", evicted);
            }
        }
    }

    pub fn contains(&self, path: &str, separator: &str) -> bool {
        self.entries
            .contains_key(&(path.to_string(), separator.to_string()))
    }

    /// Raw paths in eviction order, least recently used first.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|(path, _)| path.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(key: &str) -> ParsedPath {
        ParsedPath::from(vec![key])
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = PathCache::new(3);
        cache.insert("a", ".", parsed("a"));
        cache.insert("b", ".", parsed("b"));
        cache.insert("c", ".", parsed("c"));

        // Touch "a" so "b" becomes the oldest
        assert_eq!(cache.get("a", "."), Some(parsed("a")));
        cache.insert("d", ".", parsed("d"));

        assert_eq!(cache.paths().collect::<Vec<_>>(), vec!["c", "a", "d"]);
        assert!(!cache.contains("b", "."));
    }

    #[test]
    fn test_separator_is_part_of_key() {
        let mut cache = PathCache::default();
        cache.insert("a.b", ".", ParsedPath::from(vec!["a", "b"]));
        assert!(cache.get("a.b", "/").is_none());
        assert!(cache.get("a.b", ".").is_some());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut cache = PathCache::new(0);
        cache.insert("a", ".", parsed("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reinsert_moves_to_back() {
        let mut cache = PathCache::new(2);
        cache.insert("a", ".", parsed("a"));
        cache.insert("b", ".", parsed("b"));
        cache.insert("a", ".", parsed("a"));
        cache.insert("c", ".", parsed("c"));
        assert_eq!(cache.paths().collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
