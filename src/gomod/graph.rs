//! Direct-dependency set via `go mod graph`.

use crate::error::{Result, ScanError};
use crate::exec::CommandRunner;
use std::collections::HashSet;
use std::path::Path;

/// Pseudo-modules the graph reports for the language and toolchain versions.
const TOOLCHAIN_NODES: &[&str] = &["go", "toolchain"];

/// Resolve the set of module paths the root module requires directly.
pub fn direct_dependencies(runner: &dyn CommandRunner, root: &Path) -> Result<HashSet<String>> {
    let output = runner
        .run(Some(root), "go", &["mod", "graph"])
        .map_err(|e| ScanError::tool("failed to get module graph", e))?;

    Ok(parse_module_graph(&String::from_utf8_lossy(&output)))
}

/// Parse `go mod graph` output into the direct-dependency set.
///
/// Each line is `<consumer> <dependency>@<version>`. The root module is the
/// only consumer printed without a version.
#[must_use]
pub fn parse_module_graph(text: &str) -> HashSet<String> {
    text.lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let consumer = tokens.next()?;
            let dependency = tokens.next()?;
            if consumer.contains('@') {
                return None;
            }
            let path = dependency
                .split_once('@')
                .map_or(dependency, |(path, _)| path);
            if path.is_empty() || TOOLCHAIN_NODES.contains(&path) {
                None
            } else {
                Some(path.to_string())
            }
        })
        .collect()
}
