//! Fixed-window rate limiting
//!
//! Tracks request counts per caller key within fixed time windows and
//! rejects callers that exceed their quota. Rejection is an ordinary return
//! value carrying a retry-after hint, never an error.

mod limiter;
mod types;
mod utils;


pub use limiter::RateLimiter;
pub use types::{LiveWindow, Quota, RateLimitDecision, RateLimitStatus};
