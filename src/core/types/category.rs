//! Static row-index to category table

use crate::core::traits::CategoryLookup;
use serde::{Deserialize, Serialize};

/// Identifier the catalog store assigns to a category
pub type CategoryId = i64;

/// Category name plus optional parent, as the store needs it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

impl CategoryRef {
    pub fn new(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
        }
    }
}

/// A contiguous, inclusive interval of 1-based row indexes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRange {
    pub start: usize,
    pub end: usize,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

impl CategoryRange {
    pub fn contains(&self, row_index: usize) -> bool {
        (self.start..=self.end).contains(&row_index)
    }

    pub fn category(&self) -> CategoryRef {
        CategoryRef {
            name: self.name.clone(),
            parent: self.parent.clone(),
        }
    }
}

/// Ordered, read-only range table
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    ranges: Vec<CategoryRange>,
}

impl CategoryTable {
    /// Build a table; ranges are sorted by start. Overlaps are rejected by
    /// config validation, not here.
    pub fn new(mut ranges: Vec<CategoryRange>) -> Self {
        ranges.sort_by_key(|r| r.start);
        Self { ranges }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[CategoryRange] {
        &self.ranges
    }
}

impl CategoryLookup for CategoryTable {
    fn category_for_index(&self, row_index: usize) -> Option<CategoryRef> {
        // Last range starting at or before the index
        let pos = self.ranges.partition_point(|r| r.start <= row_index);
        if pos == 0 {
            return None;
        }
        let range = &self.ranges[pos - 1];
        range.contains(row_index).then(|| range.category())
    }
}
