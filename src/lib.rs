//! **Find the unmaintained dependencies of a Go module project.**
//!
//! `modvital` lists the modules a Go project depends on, looks up when each
//! one was last released or committed to, and flags every dependency whose
//! last activity is older than a configurable threshold.
//!
//! ## Core Concepts & Modules
//!
//! - **[`gomod`]**: Runs `go list -m -json all` and `go mod graph` and turns
//!   their output into [`DependencyCoordinate`]s and the direct-dependency set.
//! - **[`activity`]**: The [`ActivityResolver`] asks an on-disk cache, the
//!   module proxy, and (optionally) the source repository for a last-activity
//!   timestamp, stopping at the first source that knows.
//! - **[`scanner`]**: The [`Scanner`] selects dependencies per the
//!   [`ScanPolicy`] and the [`ScanCoordinator`] resolves them on a bounded
//!   worker pool, collecting records into a [`ScanResult`].
//! - **[`reports`]**: Human-readable summary and JSON output.
//! - **[`config`]**: `.modvital.yaml` loading, presets, and validation.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::sync::Arc;
//! use modvital::activity::{ActivityResolver, ResolverConfig, NoOpClient};
//! use modvital::exec::SystemRunner;
//! use modvital::{ScanPolicy, Scanner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = Arc::new(SystemRunner::new());
//!     let resolver = ActivityResolver::from_config(
//!         &ResolverConfig::default(),
//!         Arc::new(NoOpClient),
//!         runner.clone(),
//!     )?;
//!
//!     let mut scanner = Scanner::new(".", ScanPolicy::new(365, false, 4), runner, resolver);
//!     let result = scanner.scan()?;
//!
//!     for record in result.inactive() {
//!         println!("{}@{} is inactive", record.path, record.version);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `registry` (default): module proxy lookups over HTTP via `reqwest`.
//!   Without it every proxy lookup reports the registry as unavailable.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_wrap
)]

pub mod activity;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod gomod;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod scanner;

// Re-export main types for convenience
pub use activity::{ActivityResolver, ActivityStrategy, ResolutionOutcome, ResolverConfig};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use error::{ErrorContext, Result, ScanError};
pub use exec::{CommandError, CommandRunner, SystemRunner};
pub use model::{
    DependencyCoordinate, DependencyRecord, DirectSetFallback, ScanPolicy, ScanResult, ScanSummary,
};
pub use reports::{ReportFormat, ReportGenerator};
pub use scanner::{ResultAggregate, ScanCoordinator, Scanner};
