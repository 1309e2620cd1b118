//! Cache manager tests

#[cfg(test)]
mod tests {
    use super::super::manager::CacheManager;
    use super::super::memoize::{cache_aside, cache_aside_with_lock};
    use super::super::types::{ttl, CacheOptions};
    use crate::config::models::cache::CacheConfig;
    use crate::utils::error::GovernanceError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn cache() -> CacheManager<String> {
        CacheManager::new(CacheConfig::default()).unwrap()
    }

    fn short_ttl() -> CacheOptions {
        CacheOptions::with_ttl(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = cache();
        assert!(cache.get("k").is_none());

        cache.set("k", "v".to_string(), CacheOptions::default());
        assert_eq!(cache.get("k"), Some("v".to_string()));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry_behaves_as_miss() {
        let cache = cache();
        cache.set("k", "v".to_string(), short_ttl());
        assert_eq!(cache.get("k"), Some("v".to_string()));

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(cache.get("k").is_none());
        // The expired entry was removed, not merely hidden
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_ttl_applies() {
        let cache = cache();
        cache.set("k", "v".to_string(), CacheOptions::default());

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert_eq!(cache.get("k"), Some("v".to_string()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("k").is_none());
    }

    #[tokio::test]
    async fn test_tag_invalidation() {
        let cache = cache();
        cache.set("a", "1".to_string(), CacheOptions::default().tag("T"));
        cache.set("b", "2".to_string(), CacheOptions::default().tag("T"));
        cache.set("c", "3".to_string(), CacheOptions::default().tag("U"));

        assert_eq!(cache.invalidate_by_tag("T"), 2);

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[tokio::test]
    async fn test_invalidate_unknown_tag_is_noop() {
        let cache = cache();
        cache.set("a", "1".to_string(), CacheOptions::default().tag("T"));
        assert_eq!(cache.invalidate_by_tag("nope"), 0);
        assert_eq!(cache.get("a"), Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_overwrite_retires_old_tags() {
        let cache = cache();
        cache.set("k", "v1".to_string(), CacheOptions::default().tag("T"));
        cache.set("k", "v2".to_string(), CacheOptions::default().tag("U"));

        // The entry no longer carries "T"
        assert_eq!(cache.invalidate_by_tag("T"), 0);
        assert_eq!(cache.get("k"), Some("v2".to_string()));

        assert_eq!(cache.invalidate_by_tag("U"), 1);
        assert!(cache.get("k").is_none());
    }

    #[tokio::test]
    async fn test_delete_retires_tags_and_is_idempotent() {
        let cache = cache();
        assert!(!cache.delete("absent"));

        cache.set("a", "1".to_string(), CacheOptions::default().tag("T"));
        cache.set("b", "2".to_string(), CacheOptions::default().tag("T"));

        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));

        // Only the surviving member is still behind the tag
        assert_eq!(cache.invalidate_by_tag("T"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_by_tag_tolerates_expired_members() {
        let cache = cache();
        cache.set("a", "1".to_string(), short_ttl().tag("T"));
        cache.set("b", "2".to_string(), CacheOptions::default().tag("T"));

        tokio::time::advance(Duration::from_secs(2)).await;
        // "a" expired but was never read, so it is still indexed; both are
        // gone once the tag is invalidated
        assert_eq!(cache.invalidate_by_tag("T"), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = cache();
        cache.set("a", "1".to_string(), CacheOptions::default().tag("T"));
        cache.set("b", "2".to_string(), CacheOptions::default());

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
        assert_eq!(cache.invalidate_by_tag("T"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nx_set_refuses_live_entry() {
        let cache = cache();
        assert!(cache.set("k", "first".to_string(), short_ttl().nx()));
        assert!(!cache.set("k", "second".to_string(), short_ttl().nx()));
        assert_eq!(cache.get("k"), Some("first".to_string()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.set("k", "third".to_string(), short_ttl().nx()));
        assert_eq!(cache.get("k"), Some("third".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_sweep_on_write() {
        let config = CacheConfig {
            max_entries: 3,
            ..CacheConfig::default()
        };
        let cache: CacheManager<String> = CacheManager::new(config).unwrap();

        cache.set("a", "1".to_string(), short_ttl());
        cache.set("b", "2".to_string(), short_ttl());
        cache.set("c", "3".to_string(), short_ttl());
        assert_eq!(cache.len(), 3);

        tokio::time::advance(Duration::from_secs(2)).await;

        // The write that crosses the threshold sweeps the expired entries
        cache.set("d", "4".to_string(), CacheOptions::default());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_expired_sweep() {
        let cache = cache();
        cache.set("a", "1".to_string(), short_ttl().tag("T"));
        cache.set("b", "2".to_string(), CacheOptions::default().tag("T"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);

        // The swept entry's tag association went with it
        assert_eq!(cache.invalidate_by_tag("T"), 1);
    }

    #[tokio::test]
    async fn test_stats_hit_rate_and_reset() {
        let cache = cache();
        cache.set("k", "v".to_string(), CacheOptions::default());
        cache.get("k");
        cache.get("k");
        cache.get("absent");

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < f64::EPSILON);

        cache.reset_stats();
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_lock_acquire_release() {
        let cache = cache();
        assert!(cache.acquire_lock("job"));
        assert!(!cache.acquire_lock("job"));

        cache.release_lock("job");
        assert!(cache.acquire_lock("job"));

        // Releasing an unheld lock is a no-op
        cache.release_lock("never-held");
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_expires_after_ttl() {
        let cache = cache();
        assert!(cache.acquire_lock("job"));

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(cache.acquire_lock("job"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_lock_runs_and_releases() {
        let cache = cache();
        let out = cache.with_lock("job", || async { 7 }).await.unwrap();
        assert_eq!(out, 7);
        assert!(cache.acquire_lock("job"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_lock_contention_error() {
        let cache = cache();
        assert!(cache.acquire_lock("job"));

        let err = cache.with_lock("job", || async { 0 }).await.unwrap_err();
        match err {
            GovernanceError::LockContended { key, attempts } => {
                assert_eq!(key, "job");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_cache_aside_computes_once() {
        let cache = cache();
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let value = cache_aside(&cache, "expensive", CacheOptions::default(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                "computed".to_string()
            })
            .await;
            assert_eq!(value, "computed");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_aside_recomputes_after_expiry() {
        let cache = cache();
        let calls = AtomicU32::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            "v".to_string()
        };
        cache_aside(&cache, "k", short_ttl(), fetch).await;

        tokio::time::advance(Duration::from_secs(2)).await;
        cache_aside(&cache, "k", short_ttl(), fetch).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_aside_with_lock() {
        let cache = cache();
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let value =
                cache_aside_with_lock(&cache, "guarded", CacheOptions::default(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    "computed".to_string()
                })
                .await
                .unwrap();
            assert_eq!(value, "computed");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The guard lock was released after the fill
        assert!(cache.acquire_lock("guarded"));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let bad = CacheConfig {
            default_ttl_secs: 0,
            ..CacheConfig::default()
        };
        assert!(CacheManager::<String>::new(bad).is_err());
    }

    #[test]
    fn test_ttl_constants_in_seconds() {
        assert_eq!(ttl::VERY_SHORT, Duration::from_secs(60));
        assert_eq!(ttl::LONG, Duration::from_secs(3600));
    }
}
