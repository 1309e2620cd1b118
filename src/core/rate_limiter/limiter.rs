//! Core rate limiter implementation

use super::types::{ceil_secs, Quota, RateLimitDecision, RateLimitStatus, RateWindow};
use crate::config::models::rate_limit::RateLimitSettings;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Fixed-window rate limiter.
///
/// One shared window table serves every quota profile; keys are namespaced
/// per quota. Each check runs under a single write-lock acquisition, so
/// checks for the same key are linearizable. Allows up to 2x burst at window
/// boundaries, the accepted fixed-window tradeoff.
pub struct RateLimiter {
    pub(super) settings: RateLimitSettings,
    pub(super) windows: Arc<RwLock<HashMap<String, RateWindow>>>,
}

impl RateLimiter {
    /// Create a new rate limiter, failing fast on invalid preset config
    pub fn new(settings: RateLimitSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            windows: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Atomically check and record a request for `key` under `quota`.
    ///
    /// A fresh or expired window is replaced with `count = 1` and admitted.
    /// Within a live window the count increments on every call, including
    /// rejected ones, so hammering does not move the reset forward but does
    /// keep `retry_after_secs` honest.
    pub async fn check_and_record(&self, key: &str, quota: &Quota) -> RateLimitDecision {
        if !self.settings.enabled {
            return RateLimitDecision {
                allowed: true,
                limit: quota.max_requests,
                remaining: quota.max_requests,
                reset_after_secs: 0,
                retry_after_secs: None,
            };
        }

        let now = Instant::now();
        let scoped = quota.scoped(key);
        let mut windows = self.windows.write().await;

        let live = windows
            .get_mut(&scoped)
            .filter(|window| !window.is_expired(now));

        match live {
            Some(window) => {
                window.count += 1;
                let reset = window.reset_at.saturating_duration_since(now);
                let remaining = quota.max_requests.saturating_sub(window.count);

                if window.count > quota.max_requests {
                    debug!(
                        key = scoped.as_str(),
                        count = window.count,
                        limit = quota.max_requests,
                        "rate limit exceeded"
                    );
                    RateLimitDecision {
                        allowed: false,
                        limit: quota.max_requests,
                        remaining: 0,
                        reset_after_secs: reset.as_secs(),
                        retry_after_secs: Some(ceil_secs(reset).max(1)),
                    }
                } else {
                    RateLimitDecision {
                        allowed: true,
                        limit: quota.max_requests,
                        remaining,
                        reset_after_secs: reset.as_secs(),
                        retry_after_secs: None,
                    }
                }
            }
            None => {
                windows.insert(
                    scoped,
                    RateWindow {
                        count: 1,
                        reset_at: now + quota.window,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    limit: quota.max_requests,
                    remaining: quota.max_requests.saturating_sub(1),
                    reset_after_secs: quota.window.as_secs(),
                    retry_after_secs: None,
                }
            }
        }
    }

    /// Report quota usage for `key` without touching any counter
    pub async fn status(&self, key: &str, quota: &Quota) -> RateLimitStatus {
        let now = Instant::now();
        let scoped = quota.scoped(key);
        let windows = self.windows.read().await;

        match windows.get(&scoped).filter(|window| !window.is_expired(now)) {
            Some(window) => RateLimitStatus {
                limit: quota.max_requests,
                remaining: quota.max_requests.saturating_sub(window.count),
                reset_after_secs: window.reset_at.saturating_duration_since(now).as_secs(),
            },
            None => RateLimitStatus {
                limit: quota.max_requests,
                remaining: quota.max_requests,
                reset_after_secs: quota.window.as_secs(),
            },
        }
    }

    /// Clear the window for a single key; no-op when absent
    pub async fn reset(&self, key: &str, quota: &Quota) {
        let scoped = quota.scoped(key);
        let mut windows = self.windows.write().await;
        if windows.remove(&scoped).is_some() {
            debug!(key = scoped.as_str(), "rate limit window reset");
        }
    }

    /// Whether enforcement is enabled
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            windows: self.windows.clone(),
        }
    }
}
