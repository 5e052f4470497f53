//! Project-level dependency scanning.
//!
//! [`Scanner`] ties the pieces together: it checks the project, narrows the
//! module listing to the dependencies the policy asks for, and hands them to
//! a [`ScanCoordinator`] for concurrent resolution.

mod aggregate;
mod pool;

pub use aggregate::ResultAggregate;
pub use pool::ScanCoordinator;

use crate::activity::ActivityResolver;
use crate::error::{ErrorContext, Result};
use crate::exec::CommandRunner;
use crate::gomod;
use crate::model::{DependencyRecord, DirectSetFallback, ScanPolicy, ScanResult};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Scans one Go module project.
pub struct Scanner {
    project_path: PathBuf,
    policy: ScanPolicy,
    runner: Arc<dyn CommandRunner>,
    resolver: ActivityResolver,
    results: Option<ScanResult>,
}

impl Scanner {
    #[must_use]
    pub fn new(
        project_path: impl Into<PathBuf>,
        policy: ScanPolicy,
        runner: Arc<dyn CommandRunner>,
        resolver: ActivityResolver,
    ) -> Self {
        Self {
            project_path: project_path.into(),
            policy,
            runner,
            resolver,
            results: None,
        }
    }

    #[must_use]
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    #[must_use]
    pub const fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// Set the worker count for the next scan (clamped to at least one).
    pub fn set_workers(&mut self, workers: usize) {
        self.policy.set_workers(workers);
    }

    pub fn set_stale_threshold(&mut self, days: u32) {
        self.policy.stale_threshold_days = days;
    }

    pub fn set_include_indirect(&mut self, include: bool) {
        self.policy.include_indirect = include;
    }

    pub fn set_direct_set_fallback(&mut self, fallback: DirectSetFallback) {
        self.policy.direct_set_fallback = fallback;
    }

    /// Scan the project, measuring ages from the current time.
    pub fn scan(&mut self) -> Result<ScanResult> {
        self.scan_at(Utc::now())
    }

    /// Scan the project, measuring ages from `now`.
    ///
    /// Fails only if the project has no `go.mod` or its modules cannot be
    /// listed; per-dependency failures are recorded on the records.
    pub fn scan_at(&mut self, now: DateTime<Utc>) -> Result<ScanResult> {
        gomod::ensure_project(&self.project_path)?;
        let policy = self.policy;

        tracing::info!(
            "Starting dependency scan in {} (threshold: {} days, workers: {})",
            self.project_path.display(),
            policy.stale_threshold_days,
            policy.workers()
        );

        let direct = if policy.include_indirect {
            None
        } else {
            self.direct_set(policy.direct_set_fallback)
        };

        let listing = gomod::list_modules(self.runner.as_ref(), &self.project_path)
            .with_context(|| format!("scanning {}", self.project_path.display()))?;

        let mut updates = HashMap::new();
        let coordinates: Vec<_> = listing
            .modules
            .into_iter()
            .filter(|m| direct.as_ref().map_or(true, |d| d.contains(&m.coordinate.path)))
            .map(|m| {
                if let Some(update) = m.update {
                    updates.insert(m.coordinate.clone(), update);
                }
                m.coordinate
            })
            .collect();
        tracing::debug!("{} dependencies selected for scanning", coordinates.len());

        let mut result = ScanCoordinator::new(&policy, &self.resolver)
            .run_at(&self.project_path, coordinates, now)
            .context("resolving dependency activity")?;
        result.add_errors(listing.decode_errors);
        for record in &mut result.dependencies {
            record.update = updates.remove(&record.coordinate());
        }

        tracing::info!(
            "Scan complete: {} dependencies, {} inactive, {} errors",
            result.summary.total,
            result.summary.inactive,
            result.summary.errors
        );

        self.results = Some(result.clone());
        Ok(result)
    }

    /// Direct-dependency filter, or `None` to scan everything listed.
    fn direct_set(&self, fallback: DirectSetFallback) -> Option<HashSet<String>> {
        match gomod::direct_dependencies(self.runner.as_ref(), &self.project_path) {
            Ok(direct) => Some(direct),
            Err(e) => {
                tracing::warn!("Failed to determine direct dependencies: {}", e);
                match fallback {
                    DirectSetFallback::ScanAll => None,
                    DirectSetFallback::ScanNone => Some(HashSet::new()),
                }
            }
        }
    }

    /// Result of the last successful scan.
    #[must_use]
    pub const fn results(&self) -> Option<&ScanResult> {
        self.results.as_ref()
    }

    /// Inactive records of the last successful scan.
    #[must_use]
    pub fn inactive_dependencies(&self) -> Vec<&DependencyRecord> {
        self.results
            .as_ref()
            .map(ScanResult::inactive)
            .unwrap_or_default()
    }
}
