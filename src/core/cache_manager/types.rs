//! Cache manager type definitions

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Common TTLs, in seconds at heart, expressed as [`Duration`] constants
pub mod ttl {
    use std::time::Duration;

    /// 1 minute
    pub const VERY_SHORT: Duration = Duration::from_secs(60);
    /// 5 minutes
    pub const SHORT: Duration = Duration::from_secs(300);
    /// 15 minutes
    pub const MEDIUM: Duration = Duration::from_secs(900);
    /// 1 hour
    pub const LONG: Duration = Duration::from_secs(3600);
    /// 24 hours
    pub const VERY_LONG: Duration = Duration::from_secs(86_400);
}

/// Options for a `set` operation
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Entry TTL; the store's configured default applies when `None`
    pub ttl: Option<Duration>,
    /// Tags for bulk invalidation
    pub tags: Vec<String>,
    /// Only set when no live entry exists at the key
    pub nx: bool,
}

impl CacheOptions {
    /// Options with an explicit TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the TTL
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Only set when no live entry exists at the key
    pub fn nx(mut self) -> Self {
        self.nx = true;
        self
    }
}

/// A cache entry with expiry and tag metadata
#[derive(Debug, Clone)]
pub(super) struct CacheEntry<V> {
    /// The cached value
    pub(super) value: V,
    /// When the entry expires
    pub(super) expires_at: Instant,
    /// Tags carried by this entry; authoritative over the tag index
    pub(super) tags: Vec<String>,
}

impl<V> CacheEntry<V> {
    pub(super) fn new(value: V, ttl: Duration, tags: Vec<String>) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
            tags,
        }
    }

    /// Readable only while `now < expires_at`
    pub(super) fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Atomic cache counters for lock-free hot path updates
#[derive(Debug, Default)]
pub(super) struct AtomicCacheStats {
    pub(super) hits: AtomicU64,
    pub(super) misses: AtomicU64,
    pub(super) sets: AtomicU64,
    pub(super) deletes: AtomicU64,
    pub(super) evictions: AtomicU64,
}

impl AtomicCacheStats {
    pub(super) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    pub(super) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.sets.store(0, Ordering::Relaxed);
        self.deletes.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

/// Cache statistics snapshot
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing, an expired entry included
    pub misses: u64,
    /// Stored entries
    pub sets: u64,
    /// Explicit deletes, tag invalidations included
    pub deletes: u64,
    /// Expired entries removed lazily or by sweep
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of reads served from cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
