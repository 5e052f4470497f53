//! Dependency listing via `go list -json -m all`.

use crate::error::{Result, ScanError};
use crate::exec::CommandRunner;
use crate::model::DependencyCoordinate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Module descriptor file that marks a project root.
pub const MODULE_DESCRIPTOR: &str = "go.mod";

/// One entry of `go list -json -m` output.
#[derive(Debug, Deserialize)]
struct ModuleEntry {
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "Version", default)]
    version: String,
    #[serde(rename = "Main", default)]
    main: bool,
    #[serde(rename = "Indirect", default)]
    indirect: bool,
    #[serde(rename = "Update", default)]
    update: Option<ModuleUpdate>,
}

#[derive(Debug, Deserialize)]
struct ModuleUpdate {
    #[serde(rename = "Version")]
    version: String,
}

/// A dependency reported by the module tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedModule {
    /// Path and resolved version
    pub coordinate: DependencyCoordinate,
    /// Marked `// indirect` in go.mod
    pub indirect: bool,
    /// Newer version, when the tool was asked for updates
    pub update: Option<String>,
}

/// Output of a module listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleListing {
    /// Non-root modules in listing order
    pub modules: Vec<ListedModule>,
    /// Entries that could not be decoded and were skipped
    pub decode_errors: usize,
}

/// Return the descriptor path, or `ProjectNotFound` if the root has none.
pub fn ensure_project(root: &Path) -> Result<PathBuf> {
    let descriptor = root.join(MODULE_DESCRIPTOR);
    if descriptor.is_file() {
        Ok(descriptor)
    } else {
        tracing::error!("go.mod not found at {}", descriptor.display());
        Err(ScanError::project_not_found(descriptor))
    }
}

/// List every module the project resolves, excluding the root module.
///
/// The descriptor check happens before the tool is invoked.
pub fn list_modules(runner: &dyn CommandRunner, root: &Path) -> Result<ModuleListing> {
    ensure_project(root)?;

    let output = runner
        .run(Some(root), "go", &["list", "-json", "-m", "all"])
        .map_err(|e| ScanError::tool("failed to list dependencies", e))?;

    parse_module_stream(&output)
}

/// Decode a stream of concatenated `go list -json` objects.
///
/// A well-formed JSON value that is not a module entry is counted and
/// skipped. A syntax error ends the stream, since nothing after it can be
/// framed reliably; if it happens before any entry was read the whole output
/// is rejected.
pub fn parse_module_stream(bytes: &[u8]) -> Result<ModuleListing> {
    let mut listing = ModuleListing::default();
    let mut seen = 0usize;

    let stream = serde_json::Deserializer::from_slice(bytes).into_iter::<serde_json::Value>();
    for item in stream {
        let value = match item {
            Ok(value) => value,
            Err(e) if seen == 0 => {
                return Err(ScanError::decode("go list output", e.to_string()));
            }
            Err(e) => {
                tracing::error!("Failed to decode dependency stream: {}", e);
                listing.decode_errors += 1;
                break;
            }
        };
        seen += 1;

        let entry: ModuleEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Failed to decode dependency: {}", e);
                listing.decode_errors += 1;
                continue;
            }
        };

        if entry.main {
            continue;
        }
        if entry.version.is_empty() {
            tracing::debug!("Skipping {}: no resolved version", entry.path);
            continue;
        }

        listing.modules.push(ListedModule {
            coordinate: DependencyCoordinate::new(entry.path, entry.version),
            indirect: entry.indirect,
            update: entry.update.map(|u| u.version),
        });
    }

    Ok(listing)
}
