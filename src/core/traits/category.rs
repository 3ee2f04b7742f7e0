//! Category lookup trait

use crate::core::types::CategoryRef;

/// Deterministic mapping from a 1-based row index to its category
pub trait CategoryLookup: Send + Sync {
    /// `None` means the row falls outside every known range
    fn category_for_index(&self, row_index: usize) -> Option<CategoryRef>;
}
