//! Subprocess execution.
//!
//! The module tool (`go`) and source-control client (`git`) are reached
//! through the [`CommandRunner`] trait so that scans can be exercised
//! against canned output in tests.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CommandError {
    /// The program could not be started (not installed, bad working directory)
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and reported failure
    #[error("{program} exited with {}: {}", exit_label(.code), .stderr.trim())]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The program outlived its deadline and was killed
    #[error("{program} timed out after {}s", .after.as_secs())]
    TimedOut { program: String, after: Duration },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("status {c}"))
}

/// Runs a program and returns its standard output.
pub trait CommandRunner: Send + Sync {
    /// Run `program args...`, optionally inside `dir`.
    ///
    /// A non-zero exit is reported as [`CommandError::NonZeroExit`], distinct
    /// from I/O failures to start the process.
    fn run(
        &self,
        dir: Option<&Path>,
        program: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, CommandError>;
}

/// [`CommandRunner`] backed by `std::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner without a deadline.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill any command still running after `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn run_with_deadline(
        mut cmd: Command,
        program: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, CommandError> {
        let spawn_error = |source| CommandError::Spawn {
            program: program.to_string(),
            source,
        };
        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Drain both pipes concurrently so a chatty child can't block on a full pipe.
        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let status = match child.wait_timeout(timeout).map_err(spawn_error)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!("{} killed after {:?}", program, timeout);
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    after: timeout,
                });
            }
        };

        let stdout = stdout_reader
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        let stderr = stderr_reader
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        finish(
            program,
            Output {
                status,
                stdout,
                stderr,
            },
        )
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        dir: Option<&Path>,
        program: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, CommandError> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(program, ?args, dir = ?dir, "running command");

        // A deadline past the end of the clock is no deadline at all.
        let timeout = self
            .timeout
            .filter(|t| Instant::now().checked_add(*t).is_some());
        match timeout {
            Some(timeout) => Self::run_with_deadline(cmd, program, timeout),
            None => {
                let output = cmd.output().map_err(|source| CommandError::Spawn {
                    program: program.to_string(),
                    source,
                })?;
                finish(program, output)
            }
        }
    }
}

fn finish(program: &str, output: Output) -> Result<Vec<u8>, CommandError> {
    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(CommandError::NonZeroExit {
            program: program.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let out = SystemRunner::new()
            .run(None, "sh", &["-c", "printf hello"])
            .expect("sh should run");
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_non_zero_exit_is_distinct_from_spawn_failure() {
        let err = SystemRunner::new()
            .run(None, "sh", &["-c", "echo boom >&2; exit 3"])
            .unwrap_err();
        match err {
            CommandError::NonZeroExit { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }

        let err = SystemRunner::new()
            .run(None, "modvital-no-such-program", &[])
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("marker.txt"), "x").expect("write marker");
        let out = SystemRunner::new()
            .with_timeout(Duration::from_secs(10))
            .run(Some(dir.path()), "ls", &[])
            .expect("ls should run");
        assert!(String::from_utf8_lossy(&out).contains("marker.txt"));
    }

    #[test]
    fn test_unrepresentable_deadline_runs_unbounded() {
        let out = SystemRunner::new()
            .with_timeout(Duration::from_secs(u64::MAX))
            .run(None, "sh", &["-c", "printf ok"])
            .expect("sh should run");
        assert_eq!(out, b"ok");
    }

    #[test]
    fn test_deadline_kills_hung_command() {
        let started = Instant::now();
        let err = SystemRunner::new()
            .with_timeout(Duration::from_millis(200))
            .run(None, "sleep", &["5"])
            .unwrap_err();
        assert!(matches!(err, CommandError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
