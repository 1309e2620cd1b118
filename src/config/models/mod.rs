//! Configuration models

pub mod cache;
pub mod rate_limit;

pub use cache::CacheConfig;
pub use rate_limit::{RateLimitConfig, RateLimitPresets, RateLimitSettings};
