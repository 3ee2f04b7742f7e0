//! Configuration data models
//!
//! This module defines all configuration structures used by the pipeline.

pub mod credential;
pub mod enrichment;
pub mod pipeline;
pub mod rate_limit;
pub mod storage;

pub use credential::*;
pub use enrichment::*;
pub use pipeline::*;
pub use rate_limit::*;
pub use storage::*;

/// Default per-credential budget when only keys are supplied
pub fn default_key_rpm() -> u32 {
    15
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}
