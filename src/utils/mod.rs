//! Shared utilities

pub mod error;
pub mod keys;
pub mod logging;
