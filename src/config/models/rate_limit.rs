//! Rate limiting configuration

use crate::utils::error::{GovernanceError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single quota profile: at most `max_requests` per `window_secs` window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window duration in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Maximum requests allowed per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

impl RateLimitConfig {
    /// Create a config from explicit values
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            window_secs,
            max_requests,
        }
    }

    /// Window duration as a [`Duration`]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Fail fast on a config no limiter can enforce
    pub fn validate(&self) -> Result<()> {
        if self.window_secs == 0 {
            return Err(GovernanceError::Config(
                "rate limit window_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_requests == 0 {
            return Err(GovernanceError::Config(
                "rate limit max_requests must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Named quota profiles for the different endpoint classes.
///
/// Each profile keeps a logically separate keyspace; applying two profiles
/// to the same caller never shares a counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPresets {
    /// Strict limits for authentication endpoints
    #[serde(default = "default_auth")]
    pub auth: RateLimitConfig,
    /// Standard API limits
    #[serde(default = "default_api")]
    pub api: RateLimitConfig,
    /// Generous limits for read operations
    #[serde(default = "default_read")]
    pub read: RateLimitConfig,
    /// Stricter limits for write operations
    #[serde(default = "default_write")]
    pub write: RateLimitConfig,
    /// Very strict limits for sensitive operations
    #[serde(default = "default_sensitive")]
    pub sensitive: RateLimitConfig,
    /// File upload limits
    #[serde(default = "default_upload")]
    pub upload: RateLimitConfig,
}

fn default_auth() -> RateLimitConfig {
    RateLimitConfig::new(15 * 60, 5)
}

fn default_api() -> RateLimitConfig {
    RateLimitConfig::new(60, 60)
}

fn default_read() -> RateLimitConfig {
    RateLimitConfig::new(60, 100)
}

fn default_write() -> RateLimitConfig {
    RateLimitConfig::new(60, 30)
}

fn default_sensitive() -> RateLimitConfig {
    RateLimitConfig::new(60 * 60, 10)
}

fn default_upload() -> RateLimitConfig {
    RateLimitConfig::new(60, 10)
}

impl Default for RateLimitPresets {
    fn default() -> Self {
        Self {
            auth: default_auth(),
            api: default_api(),
            read: default_read(),
            write: default_write(),
            sensitive: default_sensitive(),
            upload: default_upload(),
        }
    }
}

impl RateLimitPresets {
    /// Look up a preset by name
    pub fn get(&self, name: &str) -> Option<&RateLimitConfig> {
        match name {
            "auth" => Some(&self.auth),
            "api" => Some(&self.api),
            "read" => Some(&self.read),
            "write" => Some(&self.write),
            "sensitive" => Some(&self.sensitive),
            "upload" => Some(&self.upload),
            _ => None,
        }
    }

    /// Validate every preset
    pub fn validate(&self) -> Result<()> {
        for (name, config) in [
            ("auth", &self.auth),
            ("api", &self.api),
            ("read", &self.read),
            ("write", &self.write),
            ("sensitive", &self.sensitive),
            ("upload", &self.upload),
        ] {
            config
                .validate()
                .map_err(|e| GovernanceError::Config(format!("preset `{name}`: {e}")))?;
        }
        Ok(())
    }
}

/// Rate limiter settings: kill switch plus quota profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Enable rate limiting; when disabled every check admits
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Named quota profiles
    #[serde(default)]
    pub presets: RateLimitPresets,
}

fn default_enabled() -> bool {
    true
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            presets: RateLimitPresets::default(),
        }
    }
}

impl RateLimitSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.presets.validate()
    }
}
