//! Resolution caching.
//!
//! [`RouteCache`] is an LRU map from a requested path (query and hash
//! included) to its [`ResolvedRoute`]. Since the route table never changes
//! after startup, a cached resolution stays valid for the router's lifetime;
//! only capacity evicts entries. Named targets are not cached.
//!
//! Gated behind the `cache` feature flag; uses the [`lru`] crate.
//!
//! [`CacheStats`] tracks hits, misses and invalidations so you can monitor
//! cache effectiveness at runtime.
//!
//! # Examples
//!
//! ```
//! use route_navigator::cache::RouteCache;
//! use route_navigator::{RouteRecord, RouteTable};
//! use std::sync::Arc;
//!
//! let table = RouteTable::new(vec![RouteRecord::new("/about")]).unwrap();
//! let mut cache = RouteCache::new();
//!
//! assert!(cache.get("/about").is_none());
//! cache.insert("/about", Arc::new(table.resolve(&"/about".into()).unwrap()));
//!
//! assert_eq!(cache.get("/about").unwrap().path, "/about");
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::resolve::ResolvedRoute;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Number of full invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`; `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of path resolutions.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<String, Arc<ResolvedRoute>>,
    stats: CacheStats,
}

impl RouteCache {
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Create a cache with the default capacity (1000 entries).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up a resolution. Updates hit/miss stats.
    pub fn get(&mut self, path: &str) -> Option<Arc<ResolvedRoute>> {
        if let Some(route) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Resolution cache hit for '{}'", path);
            Some(Arc::clone(route))
        } else {
            self.stats.misses += 1;
            trace_log!("Resolution cache miss for '{}'", path);
            None
        }
    }

    pub fn insert(&mut self, path: impl Into<String>, route: Arc<ResolvedRoute>) {
        let path = path.into();
        trace_log!("Caching resolution of '{}' → '{}'", path, route.path);
        self.entries.push(path, route);
    }

    /// Drop every entry and count an invalidation.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Resolution cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            removed,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RouteRecord, RouteTable};

    fn resolved(path: &str) -> Arc<ResolvedRoute> {
        let table = RouteTable::new(vec![
            RouteRecord::new("/"),
            RouteRecord::new("/a"),
            RouteRecord::new("/b"),
            RouteRecord::new("/c"),
        ])
        .unwrap();
        Arc::new(table.resolve(&path.into()).unwrap())
    }

    #[test]
    fn test_cache_creation() {
        let cache = RouteCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 1000);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(RouteCache::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = RouteCache::with_capacity(2);
        cache.insert("/a", resolved("/a"));
        cache.insert("/b", resolved("/b"));
        assert!(cache.get("/a").is_some());
        cache.insert("/c", resolved("/c"));

        assert!(cache.get("/b").is_none());
        assert!(cache.get("/a").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = RouteCache::new();
        cache.insert("/", resolved("/"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_hit_rate_calculation() {
        let mut cache = RouteCache::new();
        cache.get("/a");
        cache.get("/b");
        cache.get("/c");

        cache.insert("/a", resolved("/a"));
        cache.insert("/b", resolved("/b"));

        cache.get("/a");
        cache.get("/b");

        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 3);
        assert!((cache.stats().hit_rate() - 0.4).abs() < 0.001);
    }
}
