//! Shared, append-only result aggregate.

use crate::model::{DependencyRecord, ScanResult};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Collects records from concurrent workers.
///
/// The lock is held only for the push and counter update. Reading the result
/// requires consuming the aggregate, which can only happen once every worker
/// has been joined.
#[derive(Debug)]
pub struct ResultAggregate {
    inner: Mutex<ScanResult>,
}

impl ResultAggregate {
    #[must_use]
    pub fn new(project_path: impl Into<PathBuf>, stale_threshold_days: u32) -> Self {
        Self {
            inner: Mutex::new(ScanResult::new(project_path, stale_threshold_days)),
        }
    }

    /// Append one finished record.
    pub fn append(&self, record: DependencyRecord) {
        // A worker that panicked mid-push cannot leave a half-updated record
        // behind, so a poisoned lock is still safe to use.
        let mut result = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        result.push(record);
    }

    /// Number of records appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dependencies
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the final result.
    #[must_use]
    pub fn into_result(self) -> ScanResult {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
