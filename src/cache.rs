//! Response caching with TTL and LRU eviction for upstream GET requests
//!
//! Keys are the fully resolved request URL, query string included, so two
//! requests share an entry only when they would hit the exact same
//! upstream resource. Expiry is lazy: an entry is checked and dropped when
//! it is read, there is no background sweep.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;

/// Default time-to-live for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default maximum number of cached responses
pub const DEFAULT_MAX_ENTRIES: usize = 200;

/// Bounded response cache with TTL expiry and strict LRU eviction
pub struct ResponseCache {
    /// `None` when capacity is zero: nothing is ever stored
    entries: Mutex<Option<LruCache<String, CachedResponse>>>,
    /// Time-to-live applied on every `set`
    ttl: Duration,
    /// Cache statistics
    stats: CacheStats,
}

/// A cached response with its absolute expiry
struct CachedResponse {
    value: Value,
    expires_at: Instant,
}

impl CachedResponse {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Cache statistics tracked atomically
#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl ResponseCache {
    /// Create a cache with the given TTL and capacity
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(NonZeroUsize::new(max_entries).map(LruCache::new)),
            ttl,
            stats: CacheStats::default(),
        }
    }

    /// Get a cached response if it exists and hasn't expired
    ///
    /// A hit promotes the entry to most-recently-used. An expired entry is
    /// removed by the lookup itself.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut guard = self.entries.lock();
        let Some(entries) = guard.as_mut() else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        let lookup = entries
            .get(key)
            .map(|entry| (!entry.is_expired()).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Some(None) => {
                entries.pop(key);
                self.stats.expirations.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value, refreshing its recency and expiry
    ///
    /// When the cache is full the least-recently-used entry is evicted
    /// first. With a capacity of zero this is a no-op.
    pub fn set(&self, key: &str, value: Value) {
        let mut guard = self.entries.lock();
        let Some(entries) = guard.as_mut() else {
            return;
        };

        let entry = CachedResponse {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        if let Some((evicted, _)) = entries.push(key.to_string(), entry) {
            if evicted != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Drop all entries
    pub fn clear(&self) {
        if let Some(entries) = self.entries.lock().as_mut() {
            entries.clear();
        }
    }

    /// Current number of entries, expired-but-unread ones included
    pub fn len(&self) -> usize {
        self.entries.lock().as_ref().map_or(0, LruCache::len)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStatsSnapshot {
        let hits = self.stats.hits.load(Ordering::Relaxed);
        let misses = self.stats.misses.load(Ordering::Relaxed);
        CacheStatsSnapshot {
            hits,
            misses,
            expirations: self.stats.expirations.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            size: self.len(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }
}

/// Snapshot of cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStatsSnapshot {
    /// Lookups served from cache
    pub hits: u64,
    /// Lookups that found nothing usable
    pub misses: u64,
    /// Entries dropped on read because their TTL had passed
    pub expirations: u64,
    /// Entries dropped to make room for a new key
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
}
