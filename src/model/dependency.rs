//! Dependency coordinates and per-dependency scan records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifying pair of a dependency path and its resolved version.
///
/// Created once per scan from the module listing and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyCoordinate {
    /// Module path, e.g. `github.com/spf13/cobra`
    pub path: String,
    /// Resolved version: a semantic tag or a pseudo-version
    pub version: String,
}

impl DependencyCoordinate {
    /// Create a new coordinate.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

/// Which strategy produced a record's activity timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivitySource {
    /// Module proxy `.info` metadata
    Registry,
    /// Commit timestamp from a cloned repository
    SourceControl,
    /// A previously resolved timestamp from the on-disk cache
    Cache,
}

impl ActivitySource {
    /// Get display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::SourceControl => "source control",
            Self::Cache => "cache",
        }
    }
}

/// Display classification of a finished record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    /// Timestamp known and within the threshold
    Active,
    /// No timestamp could be found; assumed active
    Unverified,
    /// Timestamp known and older than the threshold
    Inactive,
    /// A structural error (e.g. malformed registry response) was recorded
    Error,
}

impl ActivityStatus {
    /// Get display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Unverified => "Active, unverified",
            Self::Inactive => "Inactive",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of scanning one dependency.
///
/// Starts out active with no timestamp and is filled in exactly once by the
/// worker that resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Module path
    pub path: String,
    /// Resolved version
    pub version: String,
    /// Available upgrade reported by the module tool, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    /// Last publish or commit time; `None` when unknown
    pub last_activity: Option<DateTime<Utc>>,
    /// Whole days between `last_activity` and evaluation time
    pub days_since_activity: Option<i64>,
    /// Policy output: false once the dependency is older than the threshold
    pub is_active: bool,
    /// Structural problem encountered while resolving
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Strategy that produced `last_activity`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ActivitySource>,
}

impl DependencyRecord {
    /// Create an unresolved record for a coordinate.
    #[must_use]
    pub fn pending(coordinate: &DependencyCoordinate) -> Self {
        Self {
            path: coordinate.path.clone(),
            version: coordinate.version.clone(),
            update: None,
            last_activity: None,
            days_since_activity: None,
            is_active: true,
            error: None,
            source: None,
        }
    }

    /// The coordinate this record describes.
    #[must_use]
    pub fn coordinate(&self) -> DependencyCoordinate {
        DependencyCoordinate::new(self.path.clone(), self.version.clone())
    }

    /// Whether an activity timestamp was actually found.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.last_activity.is_some()
    }

    /// Classify the record for display.
    #[must_use]
    pub const fn status(&self) -> ActivityStatus {
        if self.error.is_some() {
            ActivityStatus::Error
        } else if !self.is_active {
            ActivityStatus::Inactive
        } else if self.last_activity.is_some() {
            ActivityStatus::Active
        } else {
            ActivityStatus::Unverified
        }
    }
}
