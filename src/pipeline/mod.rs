//! Pipeline orchestration for scans.
//!
//! Shared scan → report logic used by the CLI command handlers.

mod output;
mod report_stage;
mod scan_stage;

pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::output_report;
pub use scan_stage::{build_scanner, run_scan};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The scanner could not be assembled from configuration
    #[error("Setup failed: {reason}")]
    SetupFailed { reason: String },

    /// The scan aborted
    #[error("Scan failed: {source}")]
    ScanFailed {
        #[source]
        source: crate::error::ScanError,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Scan completed (no stale dependencies, or `--fail-on-stale` not set)
    pub const SUCCESS: i32 = 0;
    /// Stale dependencies found with `--fail-on-stale`
    pub const STALE_FOUND: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Platform-specific cache directory utilities
pub mod dirs {
    use std::path::PathBuf;

    /// Get the platform-specific cache directory
    #[must_use]
    pub fn cache_dir() -> Option<PathBuf> {
        ::dirs::cache_dir()
    }

    /// Get the default activity cache directory
    #[must_use]
    pub fn activity_cache_dir() -> PathBuf {
        cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("modvital")
            .join("activity")
    }
}
