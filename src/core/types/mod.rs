//! Core type definition module
//!
//! Rows coming in, records going out, and the category table that links them.

pub mod category;
pub mod record;
pub mod row;

pub use category::{CategoryId, CategoryRange, CategoryRef, CategoryTable};
pub use record::{CommitOutcome, EnrichedRecord, ProductDetails, DEFAULT_UNIT};
pub use row::{QueuedRow, RawRow, load_rows};
