//! Services module
//!
//! Adapters for the external services the pipeline calls.

pub mod enrichment;

pub use enrichment::{HttpEnrichmentClient, OfflineEnrichment};
