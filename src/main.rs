//! modvital: maintenance-health scanner for Go module dependencies
//!
//! Reports which dependencies of a Go project have gone without a release or
//! commit for longer than a configurable threshold.

#![allow(clippy::struct_excessive_bools)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use modvital::{
    cli,
    config::{self, AppConfig, ConfigOverrides, ConfigPreset, LOG_LEVELS},
    model::DirectSetFallback,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "modvital")]
#[command(version)]
#[command(about = "Maintenance-health scanner for Go module dependencies", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Scan completed
    1  Inactive dependencies found (with --fail-on-stale)
    3  Error occurred

EXAMPLES:
    # Scan the project in the current directory
    modvital scan

    # Flag anything untouched for six months, including indirect dependencies
    modvital scan -p ./service -t 180 --include-indirect

    # CI gate with machine-readable output
    modvital scan -o json -O modvital.json --fail-on-stale")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Log level (error, warn, info, debug, trace); `RUST_LOG` takes precedence
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<String>,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `scan` subcommand
#[derive(Parser)]
struct ScanArgs {
    /// Root of the Go module project
    #[arg(short, long, default_value = ".")]
    project_path: PathBuf,

    /// Days without activity after which a dependency is inactive [default: 365]
    #[arg(short = 't', long)]
    stale_threshold: Option<u32>,

    /// Number of concurrent lookups [default: 4]
    #[arg(short, long)]
    workers: Option<usize>,

    /// Also scan indirect (transitive) dependencies
    #[arg(long, overrides_with = "no_include_indirect")]
    include_indirect: bool,

    /// Scan only direct dependencies, even if the config file says otherwise
    #[arg(long, overrides_with = "include_indirect")]
    no_include_indirect: bool,

    /// What to scan if the direct-dependency set cannot be determined
    #[arg(long, value_enum)]
    direct_set_fallback: Option<DirectSetFallback>,

    /// Module proxy list in GOPROXY syntax (defaults to $GOPROXY)
    #[arg(long, value_name = "LIST")]
    proxy: Option<String>,

    /// Clone repositories to date pseudo-versions the proxy does not know
    #[arg(long, overrides_with = "no_source_control")]
    source_control: bool,

    /// Never clone repositories, even if the config file enables it
    #[arg(long, overrides_with = "source_control")]
    no_source_control: bool,

    /// Disable the activity cache
    #[arg(long)]
    no_cache: bool,

    /// Ignore cached timestamps and look everything up again
    #[arg(long)]
    refresh: bool,

    /// Proxy request timeout in seconds [default: 15]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format [default: summary]
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 1 if any dependency is inactive
    #[arg(long)]
    fail_on_stale: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a Go module project for unmaintained dependencies
    Scan(ScanArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Inspect or clear the activity cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Sub-subcommands for the `cache` command
#[derive(Subcommand)]
enum CacheAction {
    /// Print the cache directory
    Path,
    /// Delete every cached activity timestamp
    Clear,
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .modvital.yaml in the current directory
    Init {
        /// Start from a preset (default, ci, thorough) instead of the commented example
        #[arg(long, value_parser = parse_preset)]
        preset: Option<ConfigPreset>,
    },
}

fn parse_log_level(value: &str) -> Result<String, String> {
    let level = value.to_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(format!("expected one of: {}", LOG_LEVELS.join(", ")))
    }
}

fn parse_preset(value: &str) -> Result<ConfigPreset, String> {
    ConfigPreset::from_name(value).ok_or_else(|| {
        let names: Vec<_> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset; expected one of: {}", names.join(", "))
    })
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins, then `--log-level`, then `--verbose`/`--quiet`, then the
/// config file's `log_level`.
fn init_logging(cli: &Cli, config_level: &str) {
    let level = match (&cli.log_level, cli.verbose, cli.quiet) {
        (Some(level), _, _) => level.as_str(),
        (None, true, _) => "debug",
        (None, false, true) => "warn",
        (None, false, false) => config_level,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// A `--flag`/`--no-flag` pair. Neither given leaves the config file in charge.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn scan_overrides(cli: &Cli, args: &ScanArgs) -> ConfigOverrides {
    ConfigOverrides {
        log_level: cli.log_level.clone(),
        stale_threshold_days: args.stale_threshold,
        workers: args.workers,
        include_indirect: switch(args.include_indirect, args.no_include_indirect),
        direct_set_fallback: args.direct_set_fallback,
        proxy: args.proxy.clone(),
        timeout_secs: args.timeout,
        source_control: switch(args.source_control, args.no_source_control),
        no_cache: args.no_cache,
        refresh: args.refresh,
        format: args.output,
        output_file: args.output_file.clone(),
        no_color: cli.no_color,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load the file before logging is up, report problems once it is.
    let config_path = config::discover_config_file(cli.config.as_deref());
    let (file_config, load_error) = match &config_path {
        Some(path) => match config::load_config_file(path) {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(format!("{}: {e}", path.display()))),
        },
        None => (AppConfig::default(), None),
    };

    init_logging(&cli, &file_config.log_level);
    if let Some(err) = load_error {
        tracing::warn!("Failed to load config from {}", err);
    } else if let Some(path) = &config_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    match &cli.command {
        Commands::Scan(args) => {
            let mut config = file_config;
            config.merge(&scan_overrides(&cli, args));

            let command = cli::ScanCommand {
                project_path: args.project_path.clone(),
                config,
                fail_on_stale: args.fail_on_stale,
                quiet: cli.quiet,
            };
            match cli::run_scan(command) {
                Ok(exit_codes::SUCCESS) => Ok(()),
                Ok(code) => std::process::exit(code),
                Err(e) => {
                    tracing::error!("{:#}", e);
                    std::process::exit(exit_codes::ERROR);
                }
            }
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "modvital", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(cli.config.as_deref()),
            ConfigAction::Path => cli::run_config_path(cli.config.as_deref()),
            ConfigAction::Init { preset } => {
                let dir = std::env::current_dir().context("cannot determine current directory")?;
                let target = cli::run_config_init(&dir, *preset)?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },

        Commands::Cache { action } => match action {
            CacheAction::Path => {
                println!("{}", cli::cache_location(&file_config).display());
                Ok(())
            }
            CacheAction::Clear => {
                let removed = cli::run_cache_clear(&file_config)?;
                if !cli.quiet {
                    eprintln!("Removed {removed} cached entries");
                }
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unset_flags_do_not_override() {
        let cli = Cli::parse_from(["modvital", "scan", "-t", "30"]);
        let Commands::Scan(args) = &cli.command else {
            panic!("expected scan");
        };
        let overrides = scan_overrides(&cli, args);

        assert_eq!(overrides.stale_threshold_days, Some(30));
        assert_eq!(overrides.workers, None);
        assert_eq!(overrides.include_indirect, None);
        assert_eq!(overrides.format, None);
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::parse_from([
            "modvital",
            "--no-color",
            "scan",
            "-p",
            "/work/app",
            "-w",
            "8",
            "--include-indirect",
            "--direct-set-fallback",
            "scan-none",
            "-o",
            "json",
        ]);
        let Commands::Scan(args) = &cli.command else {
            panic!("expected scan");
        };
        let overrides = scan_overrides(&cli, args);

        assert_eq!(args.project_path, PathBuf::from("/work/app"));
        assert_eq!(overrides.workers, Some(8));
        assert_eq!(overrides.include_indirect, Some(true));
        assert_eq!(overrides.direct_set_fallback, Some(DirectSetFallback::ScanNone));
        assert_eq!(overrides.format, Some(ReportFormat::Json));
        assert!(overrides.no_color);
    }

    #[test]
    fn test_negated_flags_override_config_file() {
        let cli = Cli::parse_from([
            "modvital",
            "scan",
            "--no-include-indirect",
            "--no-source-control",
        ]);
        let Commands::Scan(args) = &cli.command else {
            panic!("expected scan");
        };
        let overrides = scan_overrides(&cli, args);
        assert_eq!(overrides.include_indirect, Some(false));
        assert_eq!(overrides.source_control, Some(false));

        let mut config = AppConfig::default();
        config.scanner.include_indirect = true;
        config.source_control.enabled = true;
        config.merge(&overrides);
        assert!(!config.scanner.include_indirect);
        assert!(!config.source_control.enabled);
    }

    #[test]
    fn test_last_of_a_flag_pair_wins() {
        let cli = Cli::parse_from([
            "modvital",
            "scan",
            "--no-include-indirect",
            "--include-indirect",
        ]);
        let Commands::Scan(args) = &cli.command else {
            panic!("expected scan");
        };
        assert_eq!(scan_overrides(&cli, args).include_indirect, Some(true));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["modvital", "--log-level", "loud", "scan"]).is_err());
    }
}
