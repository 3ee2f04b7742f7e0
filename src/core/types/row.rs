//! Raw input rows

use crate::utils::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// One line of the source price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Supplier product code; blank on category header lines
    #[serde(default)]
    pub code: String,
    /// Product name as written by the supplier
    pub name: String,
    /// Unit price
    #[serde(default)]
    pub price: f64,
}

impl RawRow {
    pub fn new(code: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price,
        }
    }

    /// Header lines introduce a category section and carry no product code.
    pub fn is_category_header(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// A row handed out by the work queue, tagged with its 1-based position in
/// the original input.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedRow {
    pub row_index: usize,
    pub row: RawRow,
}

impl QueuedRow {
    pub fn new(row_index: usize, row: RawRow) -> Self {
        Self { row_index, row }
    }

    pub fn code(&self) -> &str {
        self.row.code.trim()
    }

    pub fn name(&self) -> &str {
        &self.row.name
    }
}

impl fmt::Display for QueuedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} '{}'", self.row_index, self.row.name)
    }
}

/// Read rows from a JSON array of `{code, name, price}` objects
pub async fn load_rows(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        PipelineError::validation(format!("cannot read rows from {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&content)?)
}
