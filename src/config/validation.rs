//! Configuration validation.

use super::defaults::{MAX_CACHE_TTL_HOURS, MAX_COMMAND_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS};
use super::types::{
    AppConfig, CacheConfig, OutputConfig, RegistryConfig, ScannerConfig, SourceControlConfig,
};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Accepted `log_level` values.
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Schemes a proxy entry may use besides the literal `direct`.
const PROXY_SCHEMES: &[&str] = &["http://", "https://"];

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(ConfigError::new(
                "log_level",
                format!(
                    "Invalid log level '{}'. Valid options: {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }
        errors.extend(self.scanner.validate());
        errors.extend(self.registry.validate());
        errors.extend(self.source_control.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ScannerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.workers == 0 {
            errors.push(ConfigError::new("scanner.workers", "Workers must be at least 1"));
        }
        errors
    }
}

impl Validatable for RegistryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "registry.timeout_secs",
                "Request timeout must be greater than 0",
            ));
        } else if self.timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            errors.push(ConfigError::new(
                "registry.timeout_secs",
                format!("Request timeout must be at most {MAX_REQUEST_TIMEOUT_SECS} seconds"),
            ));
        }

        if let Some(proxy) = &self.proxy {
            for entry in proxy.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                let known =
                    entry == "direct" || PROXY_SCHEMES.iter().any(|s| entry.starts_with(s));
                if !known {
                    errors.push(ConfigError::new(
                        "registry.proxy",
                        format!(
                            "Invalid proxy entry '{entry}'. Expected 'direct' or an http(s) URL"
                        ),
                    ));
                }
            }
        }

        errors.extend(self.cache.validate());
        errors
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.enabled && self.ttl_hours == 0 {
            errors.push(ConfigError::new(
                "registry.cache.ttl_hours",
                "Cache TTL must be greater than 0 (disable the cache instead)",
            ));
        }
        if self.ttl_hours > MAX_CACHE_TTL_HOURS {
            errors.push(ConfigError::new(
                "registry.cache.ttl_hours",
                format!("Cache TTL must be at most {MAX_CACHE_TTL_HOURS} hours"),
            ));
        }
        errors
    }
}

impl Validatable for SourceControlConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.command_timeout_secs == 0 {
            errors.push(ConfigError::new(
                "source_control.command_timeout_secs",
                "Command timeout must be greater than 0",
            ));
        } else if self.command_timeout_secs > MAX_COMMAND_TIMEOUT_SECS {
            errors.push(ConfigError::new(
                "source_control.command_timeout_secs",
                format!("Command timeout must be at most {MAX_COMMAND_TIMEOUT_SECS} seconds"),
            ));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_ref().and_then(|f| f.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        errors
    }
}
