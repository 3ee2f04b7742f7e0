//! Rate Limiting Implementation
//!
//! Per-credential request windows with sliding and fixed strategies. Each
//! limiter owns its own lock so workers on different credentials never
//! contend.

mod limiter;
mod strategies;
mod types;


// Re-export public types
pub use limiter::RateLimiter;
pub use types::RateLimitResult;
