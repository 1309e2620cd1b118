//! # request-governance
//!
//! In-process request governance for API backends: a fixed-window rate
//! limiter and a TTL + tag-invalidation cache, both designed to sit in
//! front of every request a server fields.
//!
//! ## Features
//!
//! - **Fixed-window rate limiting**: O(1) per check, per-caller counters,
//!   retry-after hints, named quota presets with isolated keyspaces
//! - **TTL cache with tags**: lazy eviction on read, capacity-triggered
//!   sweeps, bulk invalidation by tag, cache-aside helpers
//! - **Rejection as data**: over-quota and cache miss are ordinary return
//!   values, never errors
//! - **Deterministic tests**: time flows through `tokio::time`, so paused
//!   clocks drive expiry in tests
//!
//! ## Quick Start
//!
//! ```rust
//! use request_governance::{
//!     CacheManager, CacheOptions, GovernanceConfig, Quota, RateLimiter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> request_governance::Result<()> {
//!     let config = GovernanceConfig::default();
//!
//!     let limiter = RateLimiter::new(config.rate_limit.clone())?;
//!     let quota = Quota::new("read", &config.rate_limit.presets.read)?;
//!
//!     let decision = limiter.check_and_record("user:42", &quota).await;
//!     if !decision.allowed {
//!         // surface a 429 with decision.retry_after_secs
//!     }
//!
//!     let cache: CacheManager<String> = CacheManager::new(config.cache)?;
//!     cache.set(
//!         "events:42",
//!         "payload".to_string(),
//!         CacheOptions::default().tag("events"),
//!     );
//!     cache.invalidate_by_tag("events");
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{
    CacheConfig, GovernanceConfig, RateLimitConfig, RateLimitPresets, RateLimitSettings,
};
pub use core::cache_manager::{
    cache_aside, cache_aside_with_lock, ttl, CacheManager, CacheOptions, CacheStats,
};
pub use core::rate_limiter::{
    LiveWindow, Quota, RateLimitDecision, RateLimitStatus, RateLimiter,
};
pub use utils::error::{GovernanceError, Result};
pub use utils::keys::{caller_key, scoped};
pub use utils::logging::init_logging;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "request-governance");
    }
}
