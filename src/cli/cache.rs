//! Cache command handlers.

use crate::activity::ActivityCache;
use crate::config::AppConfig;
use crate::pipeline::dirs;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Activity cache directory the configuration points at.
///
/// Falls back to the platform cache directory, even when caching is
/// disabled, so stale entries can still be found and removed.
#[must_use]
pub fn cache_location(config: &AppConfig) -> PathBuf {
    config
        .registry
        .cache
        .dir
        .clone()
        .unwrap_or_else(dirs::activity_cache_dir)
}

/// Delete every cached activity timestamp, returning how many were removed.
pub fn run_cache_clear(config: &AppConfig) -> Result<usize> {
    let dir = cache_location(config);
    if !dir.exists() {
        tracing::debug!("No cache at {}", dir.display());
        return Ok(0);
    }
    let cache = ActivityCache::new(dir.clone(), config.resolver_config(None).cache_ttl)
        .with_context(|| format!("failed to open cache at {}", dir.display()))?;
    let removed = cache
        .clear()
        .with_context(|| format!("failed to clear {}", cache.dir().display()))?;
    tracing::info!("Removed {} cached entries from {}", removed, cache.dir().display());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyCoordinate;
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_configured_dir_wins() {
        let mut config = AppConfig::default();
        config.registry.cache.dir = Some(PathBuf::from("/tmp/modvital-cache"));
        assert_eq!(cache_location(&config), PathBuf::from("/tmp/modvital-cache"));
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ActivityCache::new(dir.path().to_path_buf(), Duration::from_secs(60)).unwrap();
        cache
            .set(&DependencyCoordinate::new("github.com/a/b", "v1.0.0"), Utc::now())
            .unwrap();
        cache
            .set(&DependencyCoordinate::new("github.com/c/d", "v0.2.0"), Utc::now())
            .unwrap();

        let mut config = AppConfig::default();
        config.registry.cache.dir = Some(dir.path().to_path_buf());

        assert_eq!(run_cache_clear(&config).unwrap(), 2);
        assert_eq!(run_cache_clear(&config).unwrap(), 0);
    }

    #[test]
    fn test_missing_dir_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.registry.cache.dir = Some(dir.path().join("never-created"));

        assert_eq!(run_cache_clear(&config).unwrap(), 0);
        assert!(!dir.path().join("never-created").exists());
    }
}
