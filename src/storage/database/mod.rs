//! Database storage implementation using SeaORM
//!
//! This module provides the persistent catalog: products, categories and the
//! migration that creates them.

// SeaORM implementation
/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;

// Re-export the main database interface
pub use seaorm_db::{DatabaseBackendType, SeaOrmCatalogStore};
