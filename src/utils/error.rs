//! Error handling for the governance layer
//!
//! Rate-limit rejections and cache misses are ordinary return values, not
//! errors; this enum covers the setup and administrative failures only.

use thiserror::Error;

/// Result type alias for the governance layer
pub type Result<T> = std::result::Result<T, GovernanceError>;

/// Main error type for the governance layer
#[derive(Error, Debug)]
pub enum GovernanceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A cache lock could not be acquired within the retry budget
    #[error("lock for `{key}` still held after {attempts} attempts")]
    LockContended {
        /// The contended lock key
        key: String,
        /// How many acquisition attempts were made
        attempts: u32,
    },
}
