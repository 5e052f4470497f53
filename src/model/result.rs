//! Accumulated scan output.

use super::DependencyRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary counters of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of records
    pub total: usize,
    /// Records older than the threshold
    pub inactive: usize,
    /// Records with an error plus module entries that could not be decoded
    pub errors: usize,
    /// Records assumed active because no timestamp was found
    pub unverified: usize,
    /// Threshold the scan was evaluated against
    pub stale_threshold_days: u32,
}

/// Output of a scan: records in completion order plus summary counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Project root that was scanned
    pub project_path: PathBuf,
    /// One record per scanned dependency, in completion order
    pub dependencies: Vec<DependencyRecord>,
    /// Counters kept consistent with `dependencies`
    pub summary: ScanSummary,
}

impl ScanResult {
    /// Create an empty result for a project.
    #[must_use]
    pub fn new(project_path: impl Into<PathBuf>, stale_threshold_days: u32) -> Self {
        Self {
            project_path: project_path.into(),
            dependencies: Vec::new(),
            summary: ScanSummary {
                stale_threshold_days,
                ..ScanSummary::default()
            },
        }
    }

    /// Append a finished record and update the counters.
    pub fn push(&mut self, record: DependencyRecord) {
        self.summary.total += 1;
        if !record.is_active {
            self.summary.inactive += 1;
        }
        if record.error.is_some() {
            self.summary.errors += 1;
        } else if !record.is_verified() {
            self.summary.unverified += 1;
        }
        self.dependencies.push(record);
    }

    /// Count errors that happened outside any record (e.g. undecodable listing entries).
    pub fn add_errors(&mut self, count: usize) {
        self.summary.errors += count;
    }

    /// Records whose policy output is inactive, in aggregate order.
    #[must_use]
    pub fn inactive(&self) -> Vec<&DependencyRecord> {
        self.dependencies.iter().filter(|d| !d.is_active).collect()
    }

    /// Whether any scanned dependency is stale.
    #[must_use]
    pub fn has_inactive(&self) -> bool {
        self.summary.inactive > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyCoordinate;
    use chrono::Utc;

    fn record(path: &str, active: bool) -> DependencyRecord {
        let mut record = DependencyRecord::pending(&DependencyCoordinate::new(path, "v1.0.0"));
        record.is_active = active;
        record.last_activity = Some(Utc::now());
        record
    }

    #[test]
    fn test_new_result_is_empty() {
        let result = ScanResult::new(".", 180);

        assert_eq!(result.project_path, PathBuf::from("."));
        assert!(result.dependencies.is_empty());
        assert_eq!(result.summary.total, 0);
        assert_eq!(result.summary.inactive, 0);
        assert_eq!(result.summary.errors, 0);
        assert_eq!(result.summary.stale_threshold_days, 180);
    }

    #[test]
    fn test_inactive_preserves_order() {
        let mut result = ScanResult::new(".", 30);
        result.push(record("github.com/example/active", true));
        result.push(record("github.com/example/inactive1", false));
        result.push(record("github.com/example/active2", true));
        result.push(record("github.com/example/inactive2", false));

        let inactive = result.inactive();
        assert_eq!(inactive.len(), 2);
        assert_eq!(inactive[0].path, "github.com/example/inactive1");
        assert_eq!(inactive[1].path, "github.com/example/inactive2");
        assert_eq!(result.summary.total, result.dependencies.len());
        assert_eq!(result.summary.inactive, 2);
        assert!(result.has_inactive());
    }

    #[test]
    fn test_push_counts_errors_and_unverified() {
        let mut result = ScanResult::new(".", 30);

        let coord = DependencyCoordinate::new("example.com/unknown", "v0.0.1");
        result.push(DependencyRecord::pending(&coord));

        let mut broken = DependencyRecord::pending(&coord);
        broken.error = Some("invalid registry response".to_string());
        result.push(broken);

        result.add_errors(2);

        assert_eq!(result.summary.total, 2);
        assert_eq!(result.summary.unverified, 1);
        assert_eq!(result.summary.errors, 3);
        assert_eq!(result.summary.inactive, 0);
    }
}
