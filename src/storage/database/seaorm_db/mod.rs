// Module declarations
mod catalog_ops;
mod connection;
mod types;

// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmCatalogStore};
