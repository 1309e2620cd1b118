//! Cache-aside helpers
//!
//! Plain higher-order functions wrapping the get / compute / set pattern
//! around expensive lookups.

use super::manager::CacheManager;
use super::types::CacheOptions;
use crate::utils::error::Result;
use std::future::Future;

/// Return the cached value for `key`, computing and storing it on a miss.
pub async fn cache_aside<V, F, Fut>(
    cache: &CacheManager<V>,
    key: &str,
    options: CacheOptions,
    fetcher: F,
) -> V
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = V>,
{
    if let Some(value) = cache.get(key) {
        return value;
    }

    let value = fetcher().await;
    cache.set(key, value.clone(), options);
    value
}

/// [`cache_aside`] under the key's stampede-guard lock, so concurrent misses
/// for one key compute the value once instead of racing.
///
/// Fails with [`crate::GovernanceError::LockContended`] when the lock cannot
/// be acquired within the cache's retry budget.
pub async fn cache_aside_with_lock<V, F, Fut>(
    cache: &CacheManager<V>,
    key: &str,
    options: CacheOptions,
    fetcher: F,
) -> Result<V>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = V>,
{
    if let Some(value) = cache.get(key) {
        return Ok(value);
    }

    cache
        .with_lock(key, move || async move {
            // A competing task may have populated the key while we waited
            if let Some(value) = cache.get(key) {
                return value;
            }
            let value = fetcher().await;
            cache.set(key, value.clone(), options);
            value
        })
        .await
}
