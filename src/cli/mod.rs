//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs, one per subcommand.

mod cache;
mod config;
mod scan;

pub use cache::{cache_location, run_cache_clear};
pub use config::{run_config_init, run_config_path, run_config_show};
pub use scan::{run_scan, ScanCommand};
