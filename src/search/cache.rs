//! Query-embedding cache
//!
//! Repeated searches for the same query text skip the embedding call. Keyed
//! by the raw query string; capacity is small because query traffic is
//! heavily skewed toward a handful of hot queries.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

const DEFAULT_CACHE_SIZE: usize = 128;

pub struct EmbeddingCache {
    inner: Mutex<LruCache<String, Vec<f32>>>,
    hits: Mutex<u64>,
    misses: Mutex<u64>,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CACHE_SIZE).unwrap());
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            hits: Mutex::new(0),
            misses: Mutex::new(0),
        }
    }

    pub fn get(&self, query: &str) -> Option<Vec<f32>> {
        let result = self.inner.lock().get(query).cloned();
        match result {
            Some(embedding) => {
                *self.hits.lock() += 1;
                Some(embedding)
            }
            None => {
                *self.misses.lock() += 1;
                None
            }
        }
    }

    pub fn put(&self, query: impl Into<String>, embedding: Vec<f32>) {
        self.inner.lock().put(query.into(), embedding);
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = *self.hits.lock();
        let misses = *self.misses.lock();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_put_hits() {
        let cache = EmbeddingCache::new(4);
        assert!(cache.get("query").is_none());

        cache.put("query", vec![1.0, 2.0]);
        assert_eq!(cache.get("query"), Some(vec![1.0, 2.0]));
        assert!(cache.hit_rate() > 0.0);
    }

    #[test]
    fn capacity_evicts_least_recent() {
        let cache = EmbeddingCache::new(2);
        cache.put("a", vec![1.0]);
        cache.put("b", vec![2.0]);
        cache.put("c", vec![3.0]);

        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn zero_capacity_falls_back_to_default() {
        let cache = EmbeddingCache::new(0);
        cache.put("a", vec![1.0]);
        assert!(cache.get("a").is_some());
    }
}
