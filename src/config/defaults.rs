//! Default values and named presets.

use super::types::AppConfig;
use crate::reports::ReportFormat;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default module proxy request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default `go`/`git` subprocess timeout in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;

/// Default activity cache lifetime in hours (7 days).
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 168;

/// Longest accepted request timeout (1 hour).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Longest accepted subprocess timeout (1 day).
pub const MAX_COMMAND_TIMEOUT_SECS: u64 = 86_400;

/// Longest accepted cache lifetime (10 years).
pub const MAX_CACHE_TTL_HOURS: u64 = 87_600;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Direct dependencies, registry lookups only
    Default,
    /// Machine-readable output without colors
    Ci,
    /// Every dependency, with the repository clone fallback
    Thorough,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Ci => "ci",
            Self::Thorough => "thorough",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "ci" | "ci-cd" | "pipeline" => Some(Self::Ci),
            "thorough" | "full" => Some(Self::Thorough),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Direct dependencies checked against the module proxy",
            Self::Ci => "JSON output without colors for CI pipelines",
            Self::Thorough => "All dependencies, falling back to repository history",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Ci, Self::Thorough]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        let mut config = Self::default();
        match preset {
            ConfigPreset::Default => {}
            ConfigPreset::Ci => {
                config.output.format = ReportFormat::Json;
                config.output.no_color = true;
            }
            ConfigPreset::Thorough => {
                config.scanner.include_indirect = true;
                config.source_control.enabled = true;
            }
        }
        config
    }
}
