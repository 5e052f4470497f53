//! Unified error types for modvital.
//!
//! Only two failures abort a scan: a missing `go.mod` and a module listing
//! that cannot be produced. Everything that goes wrong while resolving a
//! single dependency is recorded on that dependency's record instead.

use crate::exec::CommandError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for modvital operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScanError {
    /// No module descriptor at the project root
    #[error("go.mod not found at {}", path.display())]
    ProjectNotFound { path: PathBuf },

    /// A module tool subprocess failed or could not be started
    #[error("{context}: {source}")]
    ToolInvocation {
        context: String,
        #[source]
        source: CommandError,
    },

    /// Malformed JSON from a tool or a registry response
    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be started
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Convenient Result type for modvital operations
pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    /// Create a project-not-found error for the descriptor path
    pub fn project_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ProjectNotFound { path: path.into() }
    }

    /// Create a tool invocation error with context
    pub fn tool(context: impl Into<String>, source: CommandError) -> Self {
        Self::ToolInvocation {
            context: context.into(),
            source,
        }
    }

    /// Create a decode error with context
    pub fn decode(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode("JSON", err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// failure deep in the lister reads as `scanning /repo: listing modules: ...`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<ScanError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: ScanError, new_ctx: &str) -> ScanError {
    match err {
        ScanError::ToolInvocation { context, source } => ScanError::ToolInvocation {
            context: chain_context(new_ctx, &context),
            source,
        },
        ScanError::Decode { context, message } => ScanError::Decode {
            context: chain_context(new_ctx, &context),
            message,
        },
        ScanError::Io {
            path,
            message,
            source,
        } => ScanError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ScanError::WorkerPool(msg) => ScanError::WorkerPool(chain_context(new_ctx, &msg)),
        // The descriptor path already says everything there is to say.
        other @ ScanError::ProjectNotFound { .. } => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_not_found_display() {
        let err = ScanError::project_not_found("/work/app/go.mod");
        assert_eq!(err.to_string(), "go.mod not found at /work/app/go.mod");
    }

    #[test]
    fn test_tool_error_display() {
        let err = ScanError::tool(
            "failed to list dependencies",
            CommandError::NonZeroExit {
                program: "go".to_string(),
                code: Some(1),
                stderr: "go: cannot find main module".to_string(),
            },
        );
        assert!(err.to_string().starts_with("failed to list dependencies"));
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ScanError::io("/path/to/.modvital.yaml", io_err);

        assert!(err.to_string().contains("/path/to/.modvital.yaml"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(ScanError::decode("base", "expected value"))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(ScanError::Decode { context, message }) => {
                assert_eq!(context, "outer layer: middle layer: base");
                assert_eq!(message, "expected value");
            }
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_leaves_project_not_found_untouched() {
        let result: Result<()> = Err(ScanError::project_not_found("/a/go.mod"));
        match result.context("scanning") {
            Err(ScanError::ProjectNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/a/go.mod"));
            }
            other => panic!("Expected ProjectNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(ScanError::WorkerPool("error".to_string()));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
