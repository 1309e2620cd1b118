//! Configuration management
//!
//! Serde-backed configuration with per-field defaults, loadable from YAML,
//! validated fail-fast before any component is constructed.

pub mod models;

pub use models::{CacheConfig, RateLimitConfig, RateLimitPresets, RateLimitSettings};

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for the governance layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Rate limiter settings
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

impl GovernanceConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.rate_limit.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}
