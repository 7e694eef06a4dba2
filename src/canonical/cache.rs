//! LRU cache of canonical orderings for unlabeled graphs.
//!
//! Keyed by the adjacency code of the graph as given, so a hit requires the
//! exact same node order, not merely an isomorphic graph. Sampled motifs are
//! small and highly repetitive, which keeps the hit rate useful.
//!
//! Thread-safe: lookups take a read lock and `peek` without touching recency,
//! inserts take a write lock.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::RwLock;

use super::{AdjacencyCode, Order};

/// Configuration for the canonical ordering cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            enabled: true,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to a full search.
    pub misses: u64,
}

pub(crate) struct CanonicalCache {
    entries: RwLock<LruCache<AdjacencyCode, (Order, AdjacencyCode)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CanonicalCache {
    /// Build a cache, or `None` when disabled.
    pub(crate) fn new(config: CacheConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let size = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Some(Self {
            entries: RwLock::new(LruCache::new(size)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub(crate) fn get(&self, raw: &AdjacencyCode) -> Option<(Order, AdjacencyCode)> {
        let found = self.entries.read().peek(raw).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub(crate) fn put(&self, raw: AdjacencyCode, order: Order, canonical: AdjacencyCode) {
        self.entries.write().put(raw, (order, canonical));
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        CacheStats {
            len: entries.len(),
            cap: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for CanonicalCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanonicalCache").field("stats", &self.stats()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(cells: &[u32]) -> AdjacencyCode {
        AdjacencyCode::new(2, true, cells.to_vec())
    }

    #[test]
    fn test_disabled_cache_is_none() {
        let config = CacheConfig {
            max_entries: 10,
            enabled: false,
        };
        assert!(CanonicalCache::new(config).is_none());
    }

    #[test]
    fn test_hit_and_miss_counting() {
        let cache = CanonicalCache::new(CacheConfig::default()).unwrap();
        let raw = code(&[0, 1, 0, 0]);

        assert!(cache.get(&raw).is_none());
        cache.put(raw.clone(), Order::new(vec![1, 0]), code(&[0, 0, 1, 0]));
        let (order, canonical) = cache.get(&raw).unwrap();

        assert_eq!(order.as_slice(), &[1, 0]);
        assert_eq!(canonical.cells(), &[0, 0, 1, 0]);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.len), (1, 1, 1));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let config = CacheConfig {
            max_entries: 1,
            enabled: true,
        };
        let cache = CanonicalCache::new(config).unwrap();

        cache.put(code(&[0, 0, 0, 0]), Order::identity(2), code(&[0, 0, 0, 0]));
        cache.put(code(&[1, 0, 0, 0]), Order::identity(2), code(&[1, 0, 0, 0]));

        assert!(cache.get(&code(&[0, 0, 0, 0])).is_none());
        assert_eq!(cache.stats().cap, 1);
    }
}
