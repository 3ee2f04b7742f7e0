//! Core traits module
//!
//! Boundaries between the pipeline and the services it drives. Implementations
//! are injected when the orchestrator is built.

pub mod category;
pub mod enrichment;
pub mod store;

pub use category::CategoryLookup;
pub use enrichment::EnrichmentService;
pub use store::CatalogStore;
