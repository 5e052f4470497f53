//! Scan command handler.

use crate::config::{AppConfig, Validatable};
use crate::pipeline::{self, exit_codes, output_report, PipelineError};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Scan command configuration
#[derive(Debug, Clone)]
pub struct ScanCommand {
    /// Root of the Go module project
    pub project_path: PathBuf,
    /// Effective configuration (file merged with CLI flags)
    pub config: AppConfig,
    /// Exit with [`exit_codes::STALE_FOUND`] if any dependency is inactive
    pub fail_on_stale: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

/// Run the scan command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_scan(command: ScanCommand) -> Result<i32> {
    let errors = command.config.validate();
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(|e| format!("  {e}")).collect();
        bail!("Invalid configuration:\n{}", details.join("\n"));
    }

    let result = pipeline::run_scan(&command.config, &command.project_path)?;
    output_report(&command.config, &result, command.quiet)
        .map_err(|source| PipelineError::ReportFailed { source })?;

    if command.fail_on_stale && result.has_inactive() {
        if !command.quiet {
            tracing::warn!(
                "{} of {} dependencies are inactive",
                result.summary.inactive,
                result.summary.total
            );
        }
        return Ok(exit_codes::STALE_FOUND);
    }
    Ok(exit_codes::SUCCESS)
}
