//! Configuration validation
//!
//! - `trait_def`: core Validate trait definition
//! - `config_validators`: the root Config
//! - `pipeline_validators`: pipeline and rate limit sections
//! - `credential_validators`: credential list
//! - `category_validators`: category range table
//! - `storage_validators`: storage and enrichment endpoint
//! - `tests`: test suite for all validators

mod category_validators;
mod config_validators;
mod credential_validators;
mod pipeline_validators;
mod storage_validators;
mod trait_def;

pub use category_validators::validate_category_ranges;
pub use credential_validators::validate_credentials;
pub use trait_def::Validate;
