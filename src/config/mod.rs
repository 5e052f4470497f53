//! Configuration for modvital.
//!
//! - Typed configuration sections with defaults
//! - Validation for all configuration values
//! - Named presets
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.modvital.yaml` file in your project root or `~/.config/modvital/`:
//!
//! ```yaml
//! scanner:
//!   stale_threshold_days: 180
//!   workers: 8
//! registry:
//!   proxy: https://goproxy.example,direct
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_CACHE_TTL_HOURS, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_LOG_LEVEL,
    DEFAULT_REQUEST_TIMEOUT_SECS, MAX_CACHE_TTL_HOURS, MAX_COMMAND_TIMEOUT_SECS,
    MAX_REQUEST_TIMEOUT_SECS,
};
pub use types::{
    AppConfig, AppConfigBuilder, CacheConfig, OutputConfig, RegistryConfig, ScannerConfig,
    SourceControlConfig,
};
pub use validation::{ConfigError, Validatable, LOG_LEVELS};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, ConfigOverrides, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the configuration file format.
///
/// Editors can use it for validation and autocompletion of
/// `.modvital.yaml` files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
