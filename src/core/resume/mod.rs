//! Resume offset discovery
//!
//! A restarted batch continues right after the row that produced the most
//! recently committed record. Matching is by source name; when several rows
//! share a name the first one wins.


use crate::core::traits::CatalogStore;
use crate::core::types::RawRow;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Finds where a previous batch stopped
pub struct ResumeLocator {
    store: Arc<dyn CatalogStore>,
}

impl ResumeLocator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Number of leading rows to skip
    ///
    /// Returns `0` when nothing has been committed yet or when the last
    /// committed record no longer matches any row. Store failures are returned
    /// to the caller.
    pub async fn locate(&self, rows: &[RawRow]) -> Result<usize> {
        let Some(last) = self.store.find_most_recent_committed().await? else {
            debug!("No committed records, starting from the first row");
            return Ok(0);
        };

        match rows.iter().position(|row| row.name == last.source_name) {
            Some(position) => {
                let offset = position + 1;
                info!(
                    code = %last.code,
                    name = %last.source_name,
                    offset,
                    "Resuming after last committed row"
                );
                Ok(offset)
            }
            None => {
                warn!(
                    code = %last.code,
                    name = %last.source_name,
                    "Last committed record not found in input, starting from the first row"
                );
                Ok(0)
            }
        }
    }
}
