//! Report output stage.

use super::{should_use_color, write_output, OutputTarget};
use crate::config::AppConfig;
use crate::model::ScanResult;
use crate::reports::create_reporter;
use anyhow::Result;

/// Render a scan result and write it to the configured destination.
pub fn output_report(config: &AppConfig, result: &ScanResult, quiet: bool) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let colored = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter(config.output.format, colored);
    let report = reporter.generate(result)?;

    write_output(&report, &target, quiet)
}
