//! Commit timestamps from the dependency's source repository.
//!
//! Only pseudo-versions carry a revision, so this strategy is a no-op for
//! tagged releases.

use super::{ActivityStrategy, ResolutionOutcome};
use crate::exec::CommandRunner;
use crate::model::{ActivitySource, DependencyCoordinate};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

/// Length of the abbreviated revision embedded in a pseudo-version.
pub const REVISION_LEN: usize = 12;

/// Hosts whose repositories live at exactly `host/owner/repo`.
const THREE_SEGMENT_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// Extract the revision from a pseudo-version such as
/// `v0.0.0-20240125093012-abcdef123456`.
///
/// Returns the last [`REVISION_LEN`] characters after the final `-`, or `None`
/// if the version lacks a leading `v` or the suffix is too short.
#[must_use]
pub fn extract_revision(version: &str) -> Option<&str> {
    let rest = version.strip_prefix('v')?;
    let (_, suffix) = rest.rsplit_once('-')?;
    if suffix.len() < REVISION_LEN {
        return None;
    }
    suffix.get(suffix.len() - REVISION_LEN..)
}

/// Clone URL for a module path.
///
/// On the well-known forges a module may live in a subdirectory or carry a
/// major-version suffix, so only `host/owner/repo` is kept.
#[must_use]
pub fn repository_url(module_path: &str) -> String {
    let segments: Vec<&str> = module_path.split('/').collect();
    let repo = match segments.first() {
        Some(host) if THREE_SEGMENT_HOSTS.contains(host) && segments.len() > 3 => {
            segments[..3].join("/")
        }
        _ => module_path.to_string(),
    };
    format!("https://{repo}")
}

/// Resolves a pseudo-version's commit time with a throwaway partial clone.
pub struct SourceControlStrategy {
    runner: Arc<dyn CommandRunner>,
}

impl SourceControlStrategy {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn commit_time(&self, url: &str, revision: &str, checkout: &Path) -> ResolutionOutcome {
        let target = checkout.to_string_lossy();
        if let Err(e) = self.runner.run(
            None,
            "git",
            &[
                "clone",
                "--quiet",
                "--filter=tree:0",
                "--no-checkout",
                url,
                target.as_ref(),
            ],
        ) {
            return ResolutionOutcome::Unavailable(format!("clone of {url} failed: {e}"));
        }

        let output = match self.runner.run(
            Some(checkout),
            "git",
            &["show", "-s", "--format=%cI", revision],
        ) {
            Ok(output) => output,
            Err(e) => {
                return ResolutionOutcome::Unavailable(format!(
                    "revision {revision} not found in {url}: {e}"
                ))
            }
        };

        let text = String::from_utf8_lossy(&output);
        match DateTime::parse_from_rfc3339(text.trim()) {
            Ok(time) => ResolutionOutcome::Found(time.with_timezone(&Utc)),
            Err(e) => ResolutionOutcome::Error(format!(
                "failed to parse commit time {:?}: {e}",
                text.trim()
            )),
        }
    }
}

impl ActivityStrategy for SourceControlStrategy {
    fn name(&self) -> &'static str {
        "source-control"
    }

    fn source(&self) -> ActivitySource {
        ActivitySource::SourceControl
    }

    fn resolve(&self, coordinate: &DependencyCoordinate) -> ResolutionOutcome {
        let Some(revision) = extract_revision(&coordinate.version) else {
            return ResolutionOutcome::Unavailable(format!(
                "{} is not a pseudo-version",
                coordinate.version
            ));
        };

        let checkout = match tempfile::Builder::new().prefix("modvital-repo-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                return ResolutionOutcome::Unavailable(format!(
                    "failed to create temporary directory: {e}"
                ))
            }
        };

        let url = repository_url(&coordinate.path);
        tracing::debug!(%url, revision, "resolving commit time");
        // `checkout` is dropped, and the clone deleted, on every return path.
        self.commit_time(&url, revision, checkout.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandError;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[test]
    fn test_extract_revision_cases() {
        assert_eq!(
            extract_revision("v1.0.0-20240125abcdef123456"),
            Some("abcdef123456")
        );
        assert_eq!(
            extract_revision("v0.0.0-20231215085349-5d3ee1e29b3f"),
            Some("5d3ee1e29b3f")
        );
        assert_eq!(extract_revision("v1.0.0"), None);
        assert_eq!(extract_revision("1.0.0-20240125abcdef123456"), None);
        assert_eq!(extract_revision("v1.0.0-abc"), None);
        assert_eq!(extract_revision(""), None);
    }

    #[test]
    fn test_repository_url() {
        assert_eq!(
            repository_url("github.com/Masterminds/semver/v3"),
            "https://github.com/Masterminds/semver"
        );
        assert_eq!(repository_url("github.com/spf13/cobra"), "https://github.com/spf13/cobra");
        assert_eq!(repository_url("golang.org/x/mod"), "https://golang.org/x/mod");
    }

    /// Plays `git` with a scripted commit time and records the clone target.
    struct FakeGit {
        clone_ok: bool,
        show_output: &'static str,
        clone_target: Mutex<Option<PathBuf>>,
    }

    impl FakeGit {
        fn new(clone_ok: bool, show_output: &'static str) -> Self {
            Self {
                clone_ok,
                show_output,
                clone_target: Mutex::new(None),
            }
        }
    }

    impl CommandRunner for FakeGit {
        fn run(
            &self,
            _dir: Option<&std::path::Path>,
            program: &str,
            args: &[&str],
        ) -> std::result::Result<Vec<u8>, CommandError> {
            let fail = || CommandError::NonZeroExit {
                program: program.to_string(),
                code: Some(128),
                stderr: "fatal: repository not found".to_string(),
            };
            match args.first() {
                Some(&"clone") if self.clone_ok => {
                    *self.clone_target.lock().unwrap() = args.last().map(PathBuf::from);
                    Ok(Vec::new())
                }
                Some(&"show") => Ok(self.show_output.as_bytes().to_vec()),
                _ => Err(fail()),
            }
        }
    }

    fn pseudo() -> DependencyCoordinate {
        DependencyCoordinate::new("golang.org/x/exp", "v0.0.0-20231215085349-5d3ee1e29b3f")
    }

    #[test]
    fn test_commit_time_found_and_checkout_removed() {
        let git = Arc::new(FakeGit::new(true, "2023-12-15T08:53:49+00:00\n"));
        let strategy = SourceControlStrategy::new(git.clone());

        match strategy.resolve(&pseudo()) {
            ResolutionOutcome::Found(t) => assert_eq!(t.to_rfc3339(), "2023-12-15T08:53:49+00:00"),
            other => panic!("expected Found, got {other:?}"),
        }

        let target = git.clone_target.lock().unwrap().clone().unwrap();
        assert!(!target.exists());
    }

    #[test]
    fn test_tagged_version_is_unavailable() {
        let strategy = SourceControlStrategy::new(Arc::new(FakeGit::new(true, "")));
        let coord = DependencyCoordinate::new("github.com/spf13/cobra", "v1.8.0");
        assert!(matches!(strategy.resolve(&coord), ResolutionOutcome::Unavailable(_)));
    }

    #[test]
    fn test_clone_failure_is_unavailable() {
        let strategy = SourceControlStrategy::new(Arc::new(FakeGit::new(false, "")));
        assert!(matches!(strategy.resolve(&pseudo()), ResolutionOutcome::Unavailable(_)));
    }

    #[test]
    fn test_unparsable_commit_time_is_error() {
        let strategy = SourceControlStrategy::new(Arc::new(FakeGit::new(true, "yesterday")));
        assert!(matches!(strategy.resolve(&pseudo()), ResolutionOutcome::Error(_)));
    }
}
