//! Bounded worker pool that resolves coordinates concurrently.

use super::aggregate::ResultAggregate;
use crate::activity::ActivityResolver;
use crate::error::{Result, ScanError};
use crate::model::{DependencyCoordinate, DependencyRecord, ScanPolicy, ScanResult};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, PoisonError};

/// Distributes coordinates to a fixed number of workers.
///
/// Every coordinate yields exactly one record regardless of the worker count.
pub struct ScanCoordinator<'a> {
    policy: &'a ScanPolicy,
    resolver: &'a ActivityResolver,
}

impl<'a> ScanCoordinator<'a> {
    #[must_use]
    pub const fn new(policy: &'a ScanPolicy, resolver: &'a ActivityResolver) -> Self {
        Self { policy, resolver }
    }

    /// Resolve and evaluate every coordinate against the current time.
    pub fn run(
        &self,
        project_path: &Path,
        coordinates: Vec<DependencyCoordinate>,
    ) -> Result<ScanResult> {
        self.run_at(project_path, coordinates, Utc::now())
    }

    /// Resolve and evaluate every coordinate, measuring age from `now`.
    ///
    /// Returns only after all workers have finished.
    pub fn run_at(
        &self,
        project_path: &Path,
        coordinates: Vec<DependencyCoordinate>,
        now: DateTime<Utc>,
    ) -> Result<ScanResult> {
        let aggregate = ResultAggregate::new(project_path, self.policy.stale_threshold_days);
        if coordinates.is_empty() {
            return Ok(aggregate.into_result());
        }

        let workers = self.policy.workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("modvital-worker-{i}"))
            .build()
            .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

        let (sender, receiver) = mpsc::sync_channel(coordinates.len());
        for coordinate in coordinates {
            // The queue holds every item and the receiver is alive, so this cannot block or fail.
            if sender.send(coordinate).is_err() {
                break;
            }
        }
        drop(sender);
        let queue = Mutex::new(receiver);

        pool.scope(|scope| {
            for worker in 0..workers {
                let queue = &queue;
                let aggregate = &aggregate;
                scope.spawn(move |_| self.work(worker, queue, aggregate, now));
            }
        });

        Ok(aggregate.into_result())
    }

    fn work(
        &self,
        worker: usize,
        queue: &Mutex<Receiver<DependencyCoordinate>>,
        aggregate: &ResultAggregate,
        now: DateTime<Utc>,
    ) {
        let mut processed = 0usize;
        loop {
            let next = queue.lock().unwrap_or_else(PoisonError::into_inner).recv();
            let Ok(coordinate) = next else {
                break;
            };
            aggregate.append(self.process(&coordinate, now));
            processed += 1;
        }
        tracing::debug!(worker, processed, "worker finished");
    }

    fn process(&self, coordinate: &DependencyCoordinate, now: DateTime<Utc>) -> DependencyRecord {
        let mut record = DependencyRecord::pending(coordinate);
        let resolution = self.resolver.resolve(coordinate);
        match (resolution.last_activity, resolution.source) {
            (Some(last_activity), Some(source)) => {
                self.policy.evaluate(&mut record, last_activity, source, now);
            }
            _ => record.error = resolution.error,
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityStrategy, ResolutionOutcome};
    use crate::model::ActivitySource;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;
    use std::thread;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Ages are encoded in the module path: `example.com/age/<days>`.
    struct AgeFromPath;

    impl ActivityStrategy for AgeFromPath {
        fn name(&self) -> &'static str {
            "age-from-path"
        }

        fn source(&self) -> ActivitySource {
            ActivitySource::Registry
        }

        fn resolve(&self, coordinate: &DependencyCoordinate) -> ResolutionOutcome {
            let days: i64 = coordinate
                .path
                .rsplit('/')
                .next()
                .and_then(|d| d.parse().ok())
                .unwrap_or(-1);
            thread::sleep(std::time::Duration::from_millis(days.rem_euclid(3) as u64));
            if days < 0 {
                ResolutionOutcome::Error("no age".to_string())
            } else {
                ResolutionOutcome::Found(now() - Duration::days(days))
            }
        }
    }

    fn coords(ages: &[i64]) -> Vec<DependencyCoordinate> {
        ages.iter()
            .enumerate()
            .map(|(i, d)| DependencyCoordinate::new(format!("example.com/m{i}/{d}"), "v1.0.0"))
            .collect()
    }

    #[test]
    fn test_every_coordinate_yields_one_record() {
        let resolver = ActivityResolver::new(vec![Box::new(AgeFromPath)]);
        let input = coords(&[1, 10, 100, 400, 1000, 5, 365, 366]);
        let expected: HashSet<_> = input.iter().cloned().collect();

        for workers in 1..=10 {
            let policy = ScanPolicy::new(365, false, workers);
            let result = ScanCoordinator::new(&policy, &resolver)
                .run_at(Path::new("/work/app"), input.clone(), now())
                .unwrap();

            assert_eq!(result.dependencies.len(), input.len(), "workers = {workers}");
            let seen: HashSet<_> = result
                .dependencies
                .iter()
                .map(DependencyRecord::coordinate)
                .collect();
            assert_eq!(seen, expected);
            // 400, 1000 and 366 days are past the threshold; 365 is not.
            assert_eq!(result.summary.inactive, 3);
        }
    }

    #[test]
    fn test_resolution_error_recorded_without_penalty() {
        let resolver = ActivityResolver::new(vec![Box::new(AgeFromPath)]);
        let policy = ScanPolicy::new(30, false, 2);
        let input = vec![DependencyCoordinate::new("example.com/broken/x", "v0.1.0")];

        let result = ScanCoordinator::new(&policy, &resolver)
            .run_at(Path::new("/work/app"), input, now())
            .unwrap();

        let record = &result.dependencies[0];
        assert!(record.is_active);
        assert_eq!(record.error.as_deref(), Some("no age"));
        assert_eq!(result.summary.errors, 1);
        assert_eq!(result.summary.inactive, 0);
    }

    #[test]
    fn test_empty_input() {
        let resolver = ActivityResolver::new(Vec::new());
        let policy = ScanPolicy::default();
        let result = ScanCoordinator::new(&policy, &resolver)
            .run(Path::new("/work/app"), Vec::new())
            .unwrap();
        assert_eq!(result.summary.total, 0);
    }
}
