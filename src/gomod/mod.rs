//! Go module tooling: dependency listing and the direct-dependency set.
//!
//! Both functions shell out to the `go` command through a
//! [`CommandRunner`](crate::exec::CommandRunner) in the project root.

mod graph;
mod list;

pub use graph::{direct_dependencies, parse_module_graph};
pub use list::{
    ensure_project, list_modules, parse_module_stream, ListedModule, ModuleListing,
    MODULE_DESCRIPTOR,
};
