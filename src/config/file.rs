//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::model::DirectSetFallback;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".modvital.yaml",
    ".modvital.yml",
    "modvital.yaml",
    "modvital.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/modvital/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("modvital")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    /// File not found
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// IO error reading file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

/// Values given explicitly on the command line.
///
/// Only `Some` fields (and `true` switches) override the file configuration,
/// so an unset flag never clobbers a configured value with its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub stale_threshold_days: Option<u32>,
    pub workers: Option<usize>,
    pub include_indirect: Option<bool>,
    pub direct_set_fallback: Option<DirectSetFallback>,
    pub proxy: Option<String>,
    pub timeout_secs: Option<u64>,
    pub source_control: Option<bool>,
    pub no_cache: bool,
    pub refresh: bool,
    pub format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub no_color: bool,
}

impl AppConfig {
    /// Apply command-line overrides on top of this configuration.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.log_level {
            self.log_level.clone_from(level);
        }

        if let Some(days) = overrides.stale_threshold_days {
            self.scanner.stale_threshold_days = days;
        }
        if let Some(workers) = overrides.workers {
            self.scanner.workers = workers;
        }
        if let Some(include) = overrides.include_indirect {
            self.scanner.include_indirect = include;
        }
        if let Some(fallback) = overrides.direct_set_fallback {
            self.scanner.direct_set_fallback = fallback;
        }

        if overrides.proxy.is_some() {
            self.registry.proxy.clone_from(&overrides.proxy);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.registry.timeout_secs = timeout;
        }
        if overrides.no_cache {
            self.registry.cache.enabled = false;
        }
        if overrides.refresh {
            self.registry.cache.bypass = true;
        }

        if let Some(enabled) = overrides.source_control {
            self.source_control.enabled = enabled;
        }

        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.output_file.is_some() {
            self.output.file.clone_from(&overrides.output_file);
        }
        if overrides.no_color {
            self.output.no_color = true;
        }
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from a configuration value.
#[must_use]
pub fn generate_example_config(config: &AppConfig) -> String {
    format!(
        r"# modvital configuration
# Place this file at .modvital.yaml in your project root or ~/.config/modvital/

{}",
        serde_yaml::to_string(config).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# modvital Configuration File
# ============================
#
# Place it at:
#   - .modvital.yaml in your project root
#   - ~/.config/modvital/modvital.yaml for global config
#
# CLI arguments always override file settings.

# Log level: error, warn, info, debug, trace
log_level: info

scanner:
  # Dependencies with no activity for longer than this are inactive
  stale_threshold_days: 365
  # Also scan transitive dependencies
  include_indirect: false
  # Concurrent lookups
  workers: 4
  # If the direct-dependency set can't be determined: scan-all or scan-none
  direct_set_fallback: scan-all

registry:
  # Comma-separated proxy list (GOPROXY syntax); defaults to $GOPROXY
  # proxy: https://proxy.golang.org,direct
  # Request timeout in seconds
  timeout_secs: 15
  cache:
    enabled: true
    # dir: ~/.cache/modvital/activity
    ttl_hours: 168
    bypass: false

source_control:
  # Clone repositories to date pseudo-versions the proxy doesn't know
  enabled: false
  # Timeout for go and git commands in seconds
  command_timeout_secs: 120

output:
  # Format: summary, json
  format: summary
  # Output file path (omit for stdout)
  # file: modvital-report.json
  no_color: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
