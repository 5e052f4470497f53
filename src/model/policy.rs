//! Staleness policy and its evaluation.

use super::{ActivitySource, DependencyRecord};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default number of days a dependency may go without activity.
pub const DEFAULT_STALE_THRESHOLD_DAYS: u32 = 365;

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 4;

/// What to scan when indirect dependencies are excluded but the direct set
/// cannot be determined.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DirectSetFallback {
    /// Treat every listed dependency as eligible
    #[default]
    ScanAll,
    /// Scan nothing and report an empty result
    ScanNone,
}

/// Configuration snapshot read once when a scan starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPolicy {
    /// Days without activity after which a dependency is stale
    pub stale_threshold_days: u32,
    /// Scan transitive dependencies as well as direct ones
    pub include_indirect: bool,
    /// Behaviour when the direct set lookup fails
    pub direct_set_fallback: DirectSetFallback,
    workers: usize,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            stale_threshold_days: DEFAULT_STALE_THRESHOLD_DAYS,
            include_indirect: false,
            direct_set_fallback: DirectSetFallback::ScanAll,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ScanPolicy {
    /// Create a policy; `workers` is clamped to at least one.
    #[must_use]
    pub fn new(stale_threshold_days: u32, include_indirect: bool, workers: usize) -> Self {
        Self {
            stale_threshold_days,
            include_indirect,
            direct_set_fallback: DirectSetFallback::default(),
            workers: workers.max(1),
        }
    }

    /// Set the worker count, clamped to at least one.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.set_workers(workers);
        self
    }

    /// Set the direct-set fallback.
    #[must_use]
    pub const fn with_direct_set_fallback(mut self, fallback: DirectSetFallback) -> Self {
        self.direct_set_fallback = fallback;
        self
    }

    /// Number of pool workers (always >= 1).
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    pub(crate) fn set_workers(&mut self, workers: usize) {
        self.workers = workers.max(1);
    }

    /// Whether `days` without activity exceeds this policy's threshold.
    #[must_use]
    pub const fn is_stale(&self, days: i64) -> bool {
        is_stale(days, self.stale_threshold_days)
    }

    /// Apply a found activity timestamp to a record, evaluated at `now`.
    pub fn evaluate(
        &self,
        record: &mut DependencyRecord,
        last_activity: DateTime<Utc>,
        source: ActivitySource,
        now: DateTime<Utc>,
    ) {
        let days = days_since(last_activity, now);
        record.last_activity = Some(last_activity);
        record.days_since_activity = Some(days);
        record.source = Some(source);
        record.is_active = !self.is_stale(days);
    }
}

/// A dependency is stale strictly after the threshold; exactly at it is active.
#[must_use]
pub const fn is_stale(days: i64, threshold_days: u32) -> bool {
    days > threshold_days as i64
}

/// Whole days elapsed from `then` to `now`, truncating partial days.
#[must_use]
pub fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_hours() / 24
}
