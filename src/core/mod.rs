//! Core governance components

pub mod cache_manager;
pub mod rate_limiter;
