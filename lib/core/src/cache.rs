//! Bounded LRU cache of recommendation results keyed by product id.
//!
//! The cache is bound to one model generation at a time. [`RecommendationCache::reset`]
//! clears it and adopts a new generation number; inserts computed against any
//! other generation are discarded, so a lookup racing a rebuild can never
//! repopulate the cache with stale rows.

use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const DEFAULT_CACHE_CAPACITY: usize = 5000;

struct Inner {
    generation: u64,
    entries: LinkedHashMap<String, Arc<Vec<String>>>,
}

pub struct RecommendationCache {
    inner: Mutex<Inner>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RecommendationCache {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                entries: LinkedHashMap::new(),
            }),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up `key`, refreshing its LRU position.
    pub fn get(&self, generation: u64, key: &str) -> Option<Arc<Vec<String>>> {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        match inner.entries.get_refresh(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert, evicting the least recently used entries past capacity.
    /// Returns false when `generation` is not the cache's current one.
    pub fn insert(&self, generation: u64, key: String, value: Arc<Vec<String>>) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return false;
        }
        inner.entries.insert(key, value);
        while inner.entries.len() > self.capacity {
            inner.entries.pop_front();
        }
        true
    }

    /// Return the cached value or compute, store and return it.
    /// `compute` runs without the lock held.
    pub fn get_or_compute<F>(&self, generation: u64, key: &str, compute: F) -> Arc<Vec<String>>
    where
        F: FnOnce() -> Vec<String>,
    {
        if let Some(hit) = self.get(generation, key) {
            return hit;
        }
        let value = Arc::new(compute());
        self.insert(generation, key.to_string(), value.clone());
        value
    }

    /// Drop every entry and bind the cache to `generation`.
    pub fn reset(&self, generation: u64) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.generation = generation;
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Arc<Vec<String>> {
        Arc::new(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_get_or_compute_memoizes() {
        let cache = RecommendationCache::new(10);
        let mut calls = 0;
        let first = cache.get_or_compute(0, "a", || {
            calls += 1;
            vec!["b".to_string()]
        });
        let second = cache.get_or_compute(0, "a", || {
            calls += 1;
            vec!["changed".to_string()]
        });
        assert_eq!(calls, 1);
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let cache = RecommendationCache::new(2);
        cache.insert(0, "a".into(), ids(&["1"]));
        cache.insert(0, "b".into(), ids(&["2"]));
        // touch "a" so "b" is the oldest
        assert!(cache.get(0, "a").is_some());
        cache.insert(0, "c".into(), ids(&["3"]));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(0, "a").is_some());
        assert!(cache.get(0, "b").is_none());
        assert!(cache.get(0, "c").is_some());
    }

    #[test]
    fn test_reset_clears_and_rejects_stale_inserts() {
        let cache = RecommendationCache::new(10);
        cache.insert(0, "a".into(), ids(&["old"]));
        cache.reset(1);

        assert!(cache.is_empty());
        assert!(cache.get(0, "a").is_none());
        assert!(!cache.insert(0, "a".into(), ids(&["stale"])));
        assert!(cache.get(1, "a").is_none());

        assert!(cache.insert(1, "a".into(), ids(&["new"])));
        assert_eq!(cache.get(1, "a").unwrap().as_slice(), ["new".to_string()]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache = RecommendationCache::new(0);
        cache.insert(0, "a".into(), ids(&["1"]));
        cache.insert(0, "b".into(), ids(&["2"]));
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
    }
}
