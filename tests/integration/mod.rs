//! Integration tests for catalog-enricher
//!
//! These tests run whole batches through the public API against real stores.

pub mod config_tests;
pub mod http_tests;
pub mod pipeline_tests;
pub mod resume_tests;
