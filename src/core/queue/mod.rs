//! Shared work queue
//!
//! Hands rows to workers one at a time, in input order, under a single
//! mutex-guarded cursor. Taking a row never awaits, so the lock is never held
//! across a suspension point.


use crate::core::types::{QueuedRow, RawRow};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// FIFO dispenser of rows shared by the worker pool
#[derive(Debug)]
pub struct WorkQueue {
    rows: Vec<QueuedRow>,
    cursor: Mutex<usize>,
    processed: AtomicUsize,
}

impl WorkQueue {
    /// Build a queue from already-indexed rows
    pub fn new(rows: Vec<QueuedRow>) -> Self {
        Self {
            rows,
            cursor: Mutex::new(0),
            processed: AtomicUsize::new(0),
        }
    }

    /// Build a queue from `rows[offset..]`, keeping each row's 1-based
    /// position in the full input and dropping category header rows.
    pub fn from_rows(rows: &[RawRow], offset: usize) -> Self {
        Self::from_rows_limited(rows, offset, None)
    }

    /// Like [`from_rows`](Self::from_rows), keeping at most `limit` products
    pub fn from_rows_limited(rows: &[RawRow], offset: usize, limit: Option<usize>) -> Self {
        let queued = rows
            .iter()
            .enumerate()
            .skip(offset)
            .filter(|(_, row)| !row.is_category_header())
            .map(|(i, row)| QueuedRow::new(i + 1, row.clone()))
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Self::new(queued)
    }

    /// Claim the next row; `None` once every row has been handed out
    pub fn take_next(&self) -> Option<QueuedRow> {
        let mut cursor = self.cursor.lock();
        let row = self.rows.get(*cursor)?.clone();
        *cursor += 1;
        Some(row)
    }

    /// Record that a claimed row reached a final outcome
    pub fn mark_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Rows not yet handed out
    pub fn remaining_count(&self) -> usize {
        self.rows.len() - *self.cursor.lock()
    }

    pub fn processed_count(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn total_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fraction of rows with a final outcome, in `0.0..=1.0`
    pub fn progress_fraction(&self) -> f64 {
        if self.rows.is_empty() {
            return 1.0;
        }
        (self.processed_count() as f64 / self.rows.len() as f64).min(1.0)
    }

    /// Snapshot of the queue counters
    pub fn progress(&self) -> QueueProgress {
        QueueProgress {
            total: self.total_count(),
            remaining: self.remaining_count(),
            processed: self.processed_count(),
            fraction: self.progress_fraction(),
        }
    }
}

/// Queue counters at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueProgress {
    pub total: usize,
    pub remaining: usize,
    pub processed: usize,
    pub fraction: f64,
}
