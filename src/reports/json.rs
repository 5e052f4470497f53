//! JSON report generator.

use super::{sorted_records, ReportError, ReportFormat, ReportGenerator};
use crate::model::{DependencyRecord, ScanResult, ScanSummary};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonScanReport<'a> {
    metadata: JsonReportMetadata,
    project_path: &'a Path,
    summary: &'a ScanSummary,
    dependencies: Vec<&'a DependencyRecord>,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, result: &ScanResult) -> Result<String, ReportError> {
        let report = JsonScanReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                generated_at: Utc::now().to_rfc3339(),
            },
            project_path: &result.project_path,
            summary: &result.summary,
            dependencies: sorted_records(result),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyCoordinate;

    #[test]
    fn test_json_envelope() {
        let mut result = ScanResult::new("/work/app", 30);
        let coord = DependencyCoordinate::new("github.com/a/b", "v1.0.0");
        result.push(DependencyRecord::pending(&coord));

        let json = JsonReporter::new().generate(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["tool"]["name"], "modvital");
        assert_eq!(value["project_path"], "/work/app");
        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["summary"]["stale_threshold_days"], 30);
        assert_eq!(value["dependencies"][0]["path"], "github.com/a/b");
        assert_eq!(value["dependencies"][0]["is_active"], true);
    }

    #[test]
    fn test_compact_output() {
        let result = ScanResult::new("/work/app", 365);
        let json = JsonReporter::new().pretty(false).generate(&result).unwrap();
        assert!(!json.contains('\n'));
    }
}
