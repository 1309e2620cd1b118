//! Rate limiter types and data structures

use crate::config::models::rate_limit::RateLimitConfig;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// A validated, named quota profile applied at a call site.
///
/// The name namespaces the limiter's keyspace, so two quotas applied to the
/// same caller key never share a counter.
#[derive(Debug, Clone)]
pub struct Quota {
    pub(super) name: Arc<str>,
    pub(super) window: Duration,
    pub(super) max_requests: u32,
}

impl Quota {
    /// Build a quota from a config, failing fast on zero window or limit
    pub fn new(name: &str, config: &RateLimitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: Arc::from(name),
            window: config.window(),
            max_requests: config.max_requests,
        })
    }

    /// The quota profile name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum requests per window
    pub fn limit(&self) -> u32 {
        self.max_requests
    }

    pub(super) fn scoped(&self, key: &str) -> String {
        format!("{}:{}", self.name, key)
    }
}

/// Outcome of a rate limit check. Rejection is data, never an error.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the window
    pub remaining: u32,
    /// Seconds until the window resets
    pub reset_after_secs: u64,
    /// Seconds to wait before retrying; only set when rejected
    pub retry_after_secs: Option<u64>,
}

impl RateLimitDecision {
    /// The informational view of this decision
    pub fn status(&self) -> RateLimitStatus {
        RateLimitStatus {
            limit: self.limit,
            remaining: self.remaining,
            reset_after_secs: self.reset_after_secs,
        }
    }

    /// Response headers for this decision, including `Retry-After` when
    /// rejecting
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = self.status().headers().to_vec();
        if let Some(retry) = self.retry_after_secs {
            headers.push(("Retry-After", retry.to_string()));
        }
        headers
    }
}

/// Read-only quota usage for a key, used for informational response headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the window
    pub remaining: u32,
    /// Seconds until the window resets
    pub reset_after_secs: u64,
}

impl RateLimitStatus {
    /// The conventional `X-RateLimit-*` header triple
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset_after_secs.to_string()),
        ]
    }
}

/// A live counting window for one scoped key
#[derive(Debug, Clone, Copy)]
pub(super) struct RateWindow {
    /// Requests observed in the current window
    pub(super) count: u32,
    /// When the window resets
    pub(super) reset_at: Instant,
}

impl RateWindow {
    /// An expired window is treated as absent and replaced, never merged
    pub(super) fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_at
    }
}

/// A live window as reported by the administrative snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveWindow {
    /// Scoped key (`<quota>:<caller>`)
    pub key: String,
    /// Requests observed in the current window
    pub count: u32,
    /// Seconds until the window resets
    pub reset_after_secs: u64,
}

/// Round a duration up to whole seconds, with a floor of zero
pub(super) fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
