//! Test utilities: record capture for assertions.

use std::sync::{Mutex, PoisonError};

use crate::handler::Handler;
use crate::record::Record;

/// A handler that clones every record it sees, for test assertions.
#[derive(Debug, Default)]
pub struct CaptureHandler {
    records: Mutex<Vec<Record>>,
}

impl CaptureHandler {
    /// Create an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every captured record, in arrival order.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of captured records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Handler for CaptureHandler {
    fn process_record(&self, record: &Record) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}
