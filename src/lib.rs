//! # catalog-enricher
//!
//! A concurrent, rate-limited pipeline that turns a supplier price list into
//! enriched catalog records.
//!
//! ## Features
//!
//! - **Bounded concurrency**: the worker count follows the combined request
//!   budget of the configured credentials
//! - **Per-credential rate limiting**: every outbound call waits for a slot in
//!   its credential's window instead of failing
//! - **Fault isolation**: a failing row is recorded and skipped, a failing
//!   worker is contained, and a circuit breaker stops a batch where most
//!   workers fail
//! - **Resumable**: a restarted batch continues after the last committed row
//!   and never commits the same product code twice
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalog_enricher::{Config, Orchestrator, OrchestratorConfig};
//! use catalog_enricher::core::types::{CategoryTable, RawRow};
//! use catalog_enricher::services::OfflineEnrichment;
//! use catalog_enricher::storage::InMemoryCatalogStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/catalog.yaml").await?;
//!     let orchestrator = Orchestrator::new(
//!         OrchestratorConfig::from_config(&config),
//!         config.credentials.clone(),
//!         Arc::new(OfflineEnrichment::new()),
//!         Arc::new(InMemoryCatalogStore::new()),
//!         Arc::new(CategoryTable::new(config.categories.clone())),
//!     );
//!
//!     let rows = vec![RawRow::new("A-1", "Widget", 100.0)];
//!     let report = orchestrator.run(&rows).await;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::{BatchReport, Orchestrator, OrchestratorConfig, RunOptions};
pub use utils::error::{PipelineError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the Unix epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
