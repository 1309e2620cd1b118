//! Cache configuration

use crate::utils::error::{GovernanceError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache store configuration.
///
/// TTLs are expressed in seconds everywhere at the config boundary; they are
/// converted to [`Duration`] internally, never inferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when a `set` does not specify one, in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// Entry count above which a write triggers a sweep of expired entries
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// TTL for stampede-guard locks, in seconds
    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,
    /// Acquisition attempts before `with_lock` gives up
    #[serde(default = "default_lock_max_retries")]
    pub lock_max_retries: u32,
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    1000
}

fn default_lock_ttl_secs() -> u64 {
    10
}

fn default_lock_max_retries() -> u32 {
    3
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            lock_ttl_secs: default_lock_ttl_secs(),
            lock_max_retries: default_lock_max_retries(),
        }
    }
}

impl CacheConfig {
    /// Default TTL as a [`Duration`]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Lock TTL as a [`Duration`]
    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    /// Fail fast on a config no cache can operate under
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl_secs == 0 {
            return Err(GovernanceError::Config(
                "cache default_ttl_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_entries == 0 {
            return Err(GovernanceError::Config(
                "cache max_entries must be greater than 0".to_string(),
            ));
        }
        if self.lock_ttl_secs == 0 {
            return Err(GovernanceError::Config(
                "cache lock_ttl_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
