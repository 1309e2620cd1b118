//! Cache manager implementation
//!
//! A single-tier TTL cache with tag-based bulk invalidation. Entries and the
//! tag index live under one lock so the index never drifts from the entries
//! it describes. Expired entries behave as misses and are removed on read;
//! writes past the configured capacity trigger a sweep.

use super::types::{AtomicCacheStats, CacheEntry, CacheOptions, CacheStats};
use crate::config::models::cache::CacheConfig;
use crate::utils::error::{GovernanceError, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Entries plus the derived tag index, guarded as one critical section
#[derive(Debug)]
pub(super) struct CacheInner<V> {
    pub(super) entries: HashMap<String, CacheEntry<V>>,
    pub(super) tags: HashMap<String, HashSet<String>>,
    /// Stampede-guard locks: key to lock expiry
    pub(super) locks: HashMap<String, Instant>,
}

/// In-memory TTL + tag cache shared across request handlers
pub struct CacheManager<V> {
    pub(super) inner: RwLock<CacheInner<V>>,
    pub(super) config: CacheConfig,
    pub(super) stats: Arc<AtomicCacheStats>,
}

impl<V: Clone> CacheManager<V> {
    /// Create a new cache, failing fast on invalid config
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: RwLock::new(CacheInner {
                entries: HashMap::new(),
                tags: HashMap::new(),
                locks: HashMap::new(),
            }),
            config,
            stats: Arc::new(AtomicCacheStats::default()),
        })
    }

    /// Look up a value. An expired entry behaves exactly like a miss and is
    /// removed along with its tag associations.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut guard = self.inner.write();
        let CacheInner { entries, tags, .. } = &mut *guard;

        let expired = entries.get(key).is_some_and(|e| e.is_expired(now));
        if expired {
            if let Some(old) = entries.remove(key) {
                retire_tags(tags, key, &old.tags);
            }
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key, "expired cache entry evicted on read");
            return None;
        }

        match entries.get(key) {
            Some(entry) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value. Last write wins; an overwrite retires the previous
    /// entry's tag associations before indexing the new ones.
    ///
    /// Returns `false` only when `options.nx` is set and a live entry
    /// already occupies the key.
    pub fn set(&self, key: impl Into<String>, value: V, options: CacheOptions) -> bool {
        let key = key.into();
        let ttl = options.ttl.unwrap_or_else(|| self.config.default_ttl());
        let now = Instant::now();

        let mut guard = self.inner.write();
        let CacheInner { entries, tags, .. } = &mut *guard;

        if options.nx {
            if let Some(existing) = entries.get(&key) {
                if !existing.is_expired(now) {
                    return false;
                }
            }
        }

        if let Some(old) = entries.remove(&key) {
            retire_tags(tags, &key, &old.tags);
        }
        for tag in &options.tags {
            tags.entry(tag.clone()).or_default().insert(key.clone());
        }
        entries.insert(key, CacheEntry::new(value, ttl, options.tags));
        self.stats.sets.fetch_add(1, Ordering::Relaxed);

        // Bound growth under write-only workloads that never trigger lazy
        // eviction on read
        if entries.len() > self.config.max_entries {
            let swept = sweep(entries, tags, now);
            if swept > 0 {
                self.stats.evictions.fetch_add(swept as u64, Ordering::Relaxed);
                info!(swept, "cache over capacity, swept expired entries");
            }
        }

        true
    }

    /// Remove a single entry and retire its tag associations; idempotent
    pub fn delete(&self, key: &str) -> bool {
        let mut guard = self.inner.write();
        let CacheInner { entries, tags, .. } = &mut *guard;

        if let Some(old) = entries.remove(key) {
            retire_tags(tags, key, &old.tags);
            self.stats.deletes.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Remove every entry currently carrying `tag`; returns how many were
    /// removed. Members that already expired away are no-ops.
    pub fn invalidate_by_tag(&self, tag: &str) -> usize {
        let mut guard = self.inner.write();
        let CacheInner { entries, tags, .. } = &mut *guard;

        let Some(keys) = tags.remove(tag) else {
            return 0;
        };

        let mut removed = 0;
        for key in keys {
            if let Some(old) = entries.remove(&key) {
                retire_tags(tags, &key, &old.tags);
                removed += 1;
            }
        }

        self.stats.deletes.fetch_add(removed as u64, Ordering::Relaxed);
        debug!(tag, removed, "invalidated cache entries by tag");
        removed
    }

    /// Remove everything, tag index and locks included. Stats counters are
    /// untouched; use [`CacheManager::reset_stats`] for those.
    pub fn clear(&self) {
        let mut guard = self.inner.write();
        guard.entries.clear();
        guard.tags.clear();
        guard.locks.clear();
        info!("cache cleared");
    }

    /// Sweep expired entries; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut guard = self.inner.write();
        let CacheInner {
            entries,
            tags,
            locks,
        } = &mut *guard;

        locks.retain(|_, expires_at| now < *expires_at);
        let swept = sweep(entries, tags, now);
        if swept > 0 {
            self.stats.evictions.fetch_add(swept as u64, Ordering::Relaxed);
            info!(swept, "swept expired cache entries");
        }
        swept
    }

    /// Number of stored entries, expired-but-unswept ones included
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Counter snapshot
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Zero all counters
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Try to take the stampede-guard lock for `key`.
    ///
    /// Returns `true` when acquired. The lock expires after the configured
    /// lock TTL, so a holder that never releases cannot wedge the key.
    pub fn acquire_lock(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut guard = self.inner.write();
        let held = guard.locks.get(key).is_some_and(|expires| now < *expires);
        if held {
            return false;
        }
        guard
            .locks
            .insert(key.to_string(), now + self.config.lock_ttl());
        true
    }

    /// Release the stampede-guard lock for `key`; idempotent
    pub fn release_lock(&self, key: &str) {
        self.inner.write().locks.remove(key);
    }

    /// Run `f` while holding the stampede-guard lock for `key`, retrying
    /// acquisition with linear backoff.
    ///
    /// Returns [`GovernanceError::LockContended`] when the lock stays held
    /// for the whole retry budget.
    pub async fn with_lock<T, F, Fut>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let max_retries = self.config.lock_max_retries.max(1);
        let mut attempt = 0;
        while !self.acquire_lock(key) {
            attempt += 1;
            if attempt >= max_retries {
                return Err(GovernanceError::LockContended {
                    key: key.to_string(),
                    attempts: max_retries,
                });
            }
            tokio::time::sleep(Duration::from_millis(100) * attempt).await;
        }

        let out = f().await;
        self.release_lock(key);
        Ok(out)
    }
}

/// Drop `key` from the index sets of `entry_tags`, pruning emptied sets
fn retire_tags(
    tags: &mut HashMap<String, HashSet<String>>,
    key: &str,
    entry_tags: &[String],
) {
    for tag in entry_tags {
        if let Some(keys) = tags.get_mut(tag) {
            keys.remove(key);
            if keys.is_empty() {
                tags.remove(tag);
            }
        }
    }
}

/// Remove every expired entry and its tag associations
fn sweep<V>(
    entries: &mut HashMap<String, CacheEntry<V>>,
    tags: &mut HashMap<String, HashSet<String>>,
    now: Instant,
) -> usize {
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_expired(now))
        .map(|(key, _)| key.clone())
        .collect();

    for key in &expired {
        if let Some(old) = entries.remove(key) {
            retire_tags(tags, key, &old.tags);
        }
    }
    expired.len()
}
