//! Configuration types for modvital.

use super::defaults::{
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_LOG_LEVEL,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::activity::ResolverConfig;
use crate::model::{DirectSetFallback, ScanPolicy, DEFAULT_STALE_THRESHOLD_DAYS, DEFAULT_WORKERS};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a config file and layered with CLI
/// flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Log verbosity: error, warn, info, debug, trace
    pub log_level: String,
    /// Scan policy
    pub scanner: ScannerConfig,
    /// Module proxy lookups
    pub registry: RegistryConfig,
    /// Repository clone fallback
    pub source_control: SourceControlConfig,
    /// Report output
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            scanner: ScannerConfig::default(),
            registry: RegistryConfig::default(),
            source_control: SourceControlConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Policy snapshot for a scan.
    #[must_use]
    pub fn scan_policy(&self) -> ScanPolicy {
        ScanPolicy::new(
            self.scanner.stale_threshold_days,
            self.scanner.include_indirect,
            self.scanner.workers,
        )
        .with_direct_set_fallback(self.scanner.direct_set_fallback)
    }

    /// Resolver settings; `default_cache_dir` is used when none is configured.
    #[must_use]
    pub fn resolver_config(&self, default_cache_dir: Option<&Path>) -> ResolverConfig {
        let cache = &self.registry.cache;
        ResolverConfig {
            proxy: self.registry.proxy.clone(),
            source_control: self.source_control.enabled,
            cache_dir: if cache.enabled {
                cache.dir.clone().or_else(|| default_cache_dir.map(Path::to_path_buf))
            } else {
                None
            },
            cache_ttl: Duration::from_secs(cache.ttl_hours.saturating_mul(3600)),
            bypass_cache: cache.bypass,
        }
    }

    /// Deadline for HTTP requests.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.registry.timeout_secs)
    }

    /// Deadline for `go` and `git` subprocesses.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.source_control.command_timeout_secs)
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the staleness threshold in days.
    pub const fn stale_threshold_days(mut self, days: u32) -> Self {
        self.config.scanner.stale_threshold_days = days;
        self
    }

    /// Set the worker count.
    pub const fn workers(mut self, workers: usize) -> Self {
        self.config.scanner.workers = workers;
        self
    }

    /// Scan indirect dependencies too.
    pub const fn include_indirect(mut self, include: bool) -> Self {
        self.config.scanner.include_indirect = include;
        self
    }

    /// Set the proxy list.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.registry.proxy = Some(proxy.into());
        self
    }

    /// Enable the source-control fallback.
    pub const fn source_control(mut self, enabled: bool) -> Self {
        self.config.source_control.enabled = enabled;
        self
    }

    /// Enable or disable the activity cache.
    pub const fn cache(mut self, enabled: bool) -> Self {
        self.config.registry.cache.enabled = enabled;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section types
// ============================================================================

/// Scan policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScannerConfig {
    /// Days without activity after which a dependency is stale
    pub stale_threshold_days: u32,
    /// Scan transitive dependencies as well as direct ones
    pub include_indirect: bool,
    /// Number of concurrent workers
    pub workers: usize,
    /// What to scan if the direct-dependency set cannot be determined
    pub direct_set_fallback: DirectSetFallback,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            stale_threshold_days: DEFAULT_STALE_THRESHOLD_DAYS,
            include_indirect: false,
            workers: DEFAULT_WORKERS,
            direct_set_fallback: DirectSetFallback::default(),
        }
    }
}

/// Module proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegistryConfig {
    /// Comma-separated proxy list; falls back to `GOPROXY`, then proxy.golang.org
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// On-disk cache of resolved timestamps
    pub cache: CacheConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache: CacheConfig::default(),
        }
    }
}

/// Activity cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the cache
    pub enabled: bool,
    /// Cache directory (default: user cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Entry lifetime in hours
    pub ttl_hours: u64,
    /// Ignore existing entries (still writes new ones)
    pub bypass: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            bypass: false,
        }
    }
}

/// Repository clone fallback settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceControlConfig {
    /// Clone repositories to date pseudo-versions the proxy can't
    pub enabled: bool,
    /// Subprocess timeout in seconds (applies to `go` and `git`)
    pub command_timeout_secs: u64,
}

impl Default for SourceControlConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: ReportFormat,
    /// Output file path (stdout if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scanner.stale_threshold_days, 365);
        assert_eq!(config.scanner.workers, 4);
        assert!(!config.scanner.include_indirect);
        assert!(!config.source_control.enabled);
        assert!(config.registry.cache.enabled);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("scanner:\n  workers: 8\n").unwrap();
        assert_eq!(config.scanner.workers, 8);
        assert_eq!(config.scanner.stale_threshold_days, 365);
        assert_eq!(config.registry.timeout_secs, 15);
    }

    #[test]
    fn test_scan_policy_clamps_workers() {
        let config = AppConfig::builder().workers(0).stale_threshold_days(30).build();
        let policy = config.scan_policy();
        assert_eq!(policy.workers(), 1);
        assert_eq!(policy.stale_threshold_days, 30);
    }

    #[test]
    fn test_resolver_config_cache_dir() {
        let default_dir = PathBuf::from("/var/cache/modvital");

        let enabled = AppConfig::default().resolver_config(Some(&default_dir));
        assert_eq!(enabled.cache_dir, Some(default_dir.clone()));
        assert_eq!(enabled.cache_ttl, Duration::from_secs(168 * 3600));

        let disabled = AppConfig::builder()
            .cache(false)
            .build()
            .resolver_config(Some(&default_dir));
        assert_eq!(disabled.cache_dir, None);
    }

    #[test]
    fn test_huge_cache_ttl_saturates() {
        let mut config = AppConfig::default();
        config.registry.cache.ttl_hours = u64::MAX / 1000;
        let resolver = config.resolver_config(None);
        assert_eq!(resolver.cache_ttl, Duration::from_secs(u64::MAX));
    }
}
