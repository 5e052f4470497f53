//! Config command handlers.

use crate::config::{
    discover_config_file, generate_example_config, generate_full_example_config, load_or_default,
    AppConfig, ConfigPreset, CONFIG_FILE_NAMES,
};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Print the effective configuration (defaults merged with the config file).
pub fn run_config_show(explicit: Option<&Path>) -> Result<()> {
    let (config, loaded_from) = load_or_default(explicit);
    match &loaded_from {
        Some(path) => eprintln!("# Loaded from: {}", path.display()),
        None => eprintln!("# No config file found; showing defaults"),
    }
    let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
    print!("{yaml}");
    Ok(())
}

/// Print the config search path and the file that would be used.
pub fn run_config_path(explicit: Option<&Path>) -> Result<()> {
    let search_paths = [
        std::env::current_dir().ok(),
        ::dirs::config_dir().map(|p| p.join("modvital")),
        ::dirs::home_dir(),
    ];
    eprintln!("Config file search paths (in order):");
    eprintln!("  (--config path, if given)");
    for path in search_paths.iter().flatten() {
        eprintln!("  {}", path.display());
    }
    eprintln!("  (git repository root, if inside one)");
    eprintln!();
    eprintln!("Recognized file names:");
    for name in CONFIG_FILE_NAMES {
        eprintln!("  {name}");
    }
    eprintln!();
    match discover_config_file(explicit) {
        Some(path) => eprintln!("Active config file: {}", path.display()),
        None => eprintln!("No config file found."),
    }
    Ok(())
}

/// Write an example `.modvital.yaml` into `dir`.
///
/// With a preset the file holds that preset's values; otherwise the fully
/// commented example is written.
pub fn run_config_init(dir: &Path, preset: Option<ConfigPreset>) -> Result<PathBuf> {
    let target = dir.join(CONFIG_FILE_NAMES[0]);
    if target.exists() {
        bail!(
            "{} already exists. Remove it first to re-initialize.",
            target.display()
        );
    }

    let content = match preset {
        Some(preset) => generate_example_config(&AppConfig::from_preset(preset)),
        None => generate_full_example_config(),
    };
    std::fs::write(&target, content)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target)
}
