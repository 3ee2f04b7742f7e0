//! Storage layer for the pipeline
//!
//! Catalog store implementations: SeaORM for real runs, memory for dry runs.

/// Database storage module
pub mod database;
/// In-memory storage module
pub mod memory;

pub use database::SeaOrmCatalogStore;
pub use memory::InMemoryCatalogStore;
