//! Scan stage: assemble a scanner from configuration and run it.

use super::{dirs, PipelineError};
use crate::activity::{http, ActivityResolver, HttpClient};
use crate::config::AppConfig;
use crate::exec::{CommandRunner, SystemRunner};
use crate::model::ScanResult;
use crate::scanner::Scanner;
use std::path::Path;
use std::sync::Arc;

/// Build a scanner for `project_path` using the system `go`/`git` and the
/// default HTTP client.
pub fn build_scanner(config: &AppConfig, project_path: &Path) -> Result<Scanner, PipelineError> {
    let runner: Arc<dyn CommandRunner> =
        Arc::new(SystemRunner::new().with_timeout(config.command_timeout()));
    let client: Arc<dyn HttpClient> = http::default_client(config.request_timeout())
        .map_err(|e| PipelineError::SetupFailed {
            reason: e.to_string(),
        })?
        .into();

    let default_cache = dirs::activity_cache_dir();
    let resolver_config = config.resolver_config(Some(&default_cache));
    let resolver = ActivityResolver::from_config(&resolver_config, client, runner.clone())
        .map_err(|e| PipelineError::SetupFailed {
            reason: e.to_string(),
        })?;
    tracing::debug!(strategies = ?resolver.strategy_names(), "activity resolver ready");

    Ok(Scanner::new(
        project_path,
        config.scan_policy(),
        runner,
        resolver,
    ))
}

/// Run a full scan of `project_path`.
pub fn run_scan(config: &AppConfig, project_path: &Path) -> Result<ScanResult, PipelineError> {
    let mut scanner = build_scanner(config, project_path)?;
    scanner
        .scan()
        .map_err(|source| PipelineError::ScanFailed { source })
}
