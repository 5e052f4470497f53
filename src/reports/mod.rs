//! Report generation for scan results.
//!
//! - Summary: compact, human-readable terminal output
//! - JSON: structured data for CI and other tooling

mod json;
mod summary;

pub use json::JsonReporter;
pub use summary::SummaryReporter;

use crate::model::{DependencyRecord, ScanResult};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Summary,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a scan result.
    fn generate(&self, result: &ScanResult) -> Result<String, ReportError>;

    /// Write report to a writer
    fn write_report(&self, result: &ScanResult, writer: &mut dyn Write) -> Result<(), ReportError> {
        let report = self.generate(result)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create the reporter for a format.
#[must_use]
pub fn create_reporter(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            let reporter = SummaryReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}

/// Records sorted by path then version, for stable output.
fn sorted_records(result: &ScanResult) -> Vec<&DependencyRecord> {
    let mut records: Vec<_> = result.dependencies.iter().collect();
    records.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.version.cmp(&b.version)));
    records
}
