//! Common test utilities for catalog-enricher
//!
//! - In-memory SQLite catalog stores
//! - Row, credential and config fixtures
//! - Scripted enrichment services and stores

pub mod mocks;

pub use database::TestCatalog;
pub use fixtures::{RowFactory, credentials, fast_config, single_category};
pub use mocks::{FlakyStore, RecordingEnrichment};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
