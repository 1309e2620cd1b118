//! TTL + tag cache management
//!
//! Memoizes values keyed by string, each with an expiry and zero or more
//! tags, and supports bulk invalidation of everything sharing a tag.

pub mod manager;
pub mod memoize;
pub mod types;

#[cfg(test)]
mod tests;

pub use manager::CacheManager;
pub use memoize::{cache_aside, cache_aside_with_lock};
pub use types::{ttl, CacheOptions, CacheStats};
