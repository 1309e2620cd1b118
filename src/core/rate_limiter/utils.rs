//! Maintenance and administrative operations for the rate limiter

use super::limiter::RateLimiter;
use super::types::LiveWindow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

impl RateLimiter {
    /// Sweep expired windows so write-once keys do not accumulate forever
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, window| !window.is_expired(now));
        let swept = before - windows.len();
        if swept > 0 {
            debug!(swept, "swept expired rate limit windows");
        }
    }

    /// Spawn a periodic cleanup task
    pub fn start_cleanup_task(self: Arc<Self>, every: Duration) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }

    /// Administrative wipe of every window across all quotas
    pub async fn clear_all(&self) {
        let mut windows = self.windows.write().await;
        windows.clear();
        info!("all rate limit windows cleared");
    }

    /// Administrative listing of live windows; expired windows are omitted
    pub async fn snapshot(&self) -> Vec<LiveWindow> {
        let now = Instant::now();
        let windows = self.windows.read().await;
        windows
            .iter()
            .filter(|(_, window)| !window.is_expired(now))
            .map(|(key, window)| LiveWindow {
                key: key.clone(),
                count: window.count,
                reset_after_secs: window.reset_at.saturating_duration_since(now).as_secs(),
            })
            .collect()
    }

    /// Number of tracked windows, expired ones included
    pub async fn len(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Whether no windows are tracked
    pub async fn is_empty(&self) -> bool {
        self.windows.read().await.is_empty()
    }
}
