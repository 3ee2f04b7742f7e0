//! Enrichment service adapters

mod http;
mod offline;
pub mod prompts;

pub use http::HttpEnrichmentClient;
pub use offline::OfflineEnrichment;
