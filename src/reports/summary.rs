//! Summary report generator for shell output.

use super::{sorted_records, ReportError, ReportFormat, ReportGenerator};
use crate::model::{ActivityStatus, DependencyRecord, ScanResult};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn dependency_line(&self, record: &DependencyRecord) -> String {
        let coordinate = format!("{}@{}", record.path, record.version);
        let status = record.status();
        let detail = match status {
            ActivityStatus::Error => {
                let message = record.error.as_deref().unwrap_or_default();
                self.color(&format!("[ERROR: {message}]"), "red")
            }
            ActivityStatus::Unverified => self.color(&format!("[{status}]"), "yellow"),
            ActivityStatus::Active | ActivityStatus::Inactive => {
                let color = if record.is_active { "green" } else { "red" };
                let mut text = self.color(&format!("[{status}]"), color);
                if let Some(days) = record.days_since_activity {
                    text.push_str(&format!(" (last activity: {days} days ago)"));
                }
                text
            }
        };
        format!("  - {coordinate} {detail}")
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(&self, result: &ScanResult) -> Result<String, ReportError> {
        let summary = &result.summary;
        let mut lines = Vec::new();

        lines.push(self.color("Dependency Scan Results", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {}",
            self.color("Project:", "cyan"),
            result.project_path.display()
        ));
        lines.push(format!(
            "{}  {} days",
            self.color("Stale threshold:", "cyan"),
            summary.stale_threshold_days
        ));
        lines.push(String::new());

        lines.push(self.color("Summary:", "bold"));
        lines.push(format!("  Total dependencies:    {}", summary.total));
        let inactive = summary.inactive.to_string();
        lines.push(format!(
            "  Inactive dependencies: {}",
            if summary.inactive > 0 {
                self.color(&inactive, "red")
            } else {
                inactive
            }
        ));
        lines.push(format!("  Unverified:            {}", summary.unverified));
        let errors = summary.errors.to_string();
        lines.push(format!(
            "  Errors:                {}",
            if summary.errors > 0 {
                self.color(&errors, "yellow")
            } else {
                errors
            }
        ));

        if !result.dependencies.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Dependencies:", "bold"));
            lines.extend(sorted_records(result).into_iter().map(|r| self.dependency_line(r)));
        }

        lines.push(String::new());
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
