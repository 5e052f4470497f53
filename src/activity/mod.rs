//! Last-activity resolution for a single dependency.
//!
//! An [`ActivityResolver`] consults the on-disk cache, then runs a
//! prioritized chain of [`ActivityStrategy`] implementations and stops at the
//! first one that finds a timestamp. When none does, the dependency is given
//! the benefit of the doubt: it stays active with an unknown timestamp.

pub mod cache;
pub mod http;
pub mod proxy;
pub mod vcs;

pub use cache::ActivityCache;
pub use http::{HttpClient, HttpError, HttpResponse, NoOpClient};
#[cfg(feature = "registry")]
pub use http::ReqwestClient;
pub use proxy::{parse_proxy_list, RegistryProxyStrategy, DEFAULT_PROXY};
pub use vcs::{extract_revision, SourceControlStrategy};

use crate::error::{ErrorContext, Result};
use crate::exec::CommandRunner;
use crate::model::{ActivitySource, DependencyCoordinate};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one strategy for one coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The dependency's last activity
    Found(DateTime<Utc>),
    /// This source has nothing to say; try the next one
    Unavailable(String),
    /// The source answered with something malformed
    Error(String),
}

/// A source of last-activity timestamps.
pub trait ActivityStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Source recorded on a record when this strategy finds a timestamp.
    fn source(&self) -> ActivitySource;

    fn resolve(&self, coordinate: &DependencyCoordinate) -> ResolutionOutcome;
}

/// What the resolver learned about one coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub last_activity: Option<DateTime<Utc>>,
    pub source: Option<ActivitySource>,
    /// Detail of the first malformed answer, if no strategy succeeded
    pub error: Option<String>,
}

impl Resolution {
    fn found(time: DateTime<Utc>, source: ActivitySource) -> Self {
        Self {
            last_activity: Some(time),
            source: Some(source),
            error: None,
        }
    }
}

/// Resolver settings derived from configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// `GOPROXY`-style list; `None` reads the environment
    pub proxy: Option<String>,
    /// Fall back to cloning the repository for pseudo-versions
    pub source_control: bool,
    /// Cache directory; `None` disables caching
    pub cache_dir: Option<PathBuf>,
    pub cache_ttl: Duration,
    /// Ignore cached entries but keep writing new ones
    pub bypass_cache: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            source_control: false,
            cache_dir: None,
            cache_ttl: Duration::from_secs(7 * 24 * 3600),
            bypass_cache: false,
        }
    }
}

/// Cache lookup plus the fallback chain.
pub struct ActivityResolver {
    strategies: Vec<Box<dyn ActivityStrategy>>,
    cache: Option<ActivityCache>,
}

impl ActivityResolver {
    /// Resolver over an explicit chain, without a cache.
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn ActivityStrategy>>) -> Self {
        Self {
            strategies,
            cache: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: ActivityCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the standard chain: registry proxy, then (if enabled) source
    /// control.
    pub fn from_config(
        config: &ResolverConfig,
        client: Arc<dyn HttpClient>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        let endpoints = proxy::resolve_proxy_list(config.proxy.as_deref());
        tracing::debug!(?endpoints, "module proxy endpoints");

        let mut strategies: Vec<Box<dyn ActivityStrategy>> =
            vec![Box::new(RegistryProxyStrategy::new(endpoints, client))];
        if config.source_control {
            strategies.push(Box::new(SourceControlStrategy::new(runner)));
        }

        let mut resolver = Self::new(strategies);
        if let Some(dir) = &config.cache_dir {
            let cache = ActivityCache::new(dir.clone(), config.cache_ttl)
                .context("opening activity cache")?;
            resolver = resolver.with_cache(cache.with_bypass(config.bypass_cache));
        }
        Ok(resolver)
    }

    /// Names of the strategies in the order they are tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a coordinate's last activity. Never fails.
    pub fn resolve(&self, coordinate: &DependencyCoordinate) -> Resolution {
        if let Some(time) = self.cache.as_ref().and_then(|c| c.get(coordinate)) {
            tracing::debug!("Cache hit for {}", coordinate);
            return Resolution::found(time, ActivitySource::Cache);
        }

        let mut first_error: Option<String> = None;
        for strategy in &self.strategies {
            match strategy.resolve(coordinate) {
                ResolutionOutcome::Found(time) => {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.set(coordinate, time) {
                            tracing::debug!("Failed to cache {}: {}", coordinate, e);
                        }
                    }
                    return Resolution::found(time, strategy.source());
                }
                ResolutionOutcome::Unavailable(reason) => {
                    tracing::debug!(
                        "{} unavailable for {}: {}",
                        strategy.name(),
                        coordinate,
                        reason
                    );
                }
                ResolutionOutcome::Error(detail) => {
                    tracing::debug!("{} failed for {}: {}", strategy.name(), coordinate, detail);
                    first_error.get_or_insert(detail);
                }
            }
        }

        tracing::warn!(
            "Could not determine last activity for {}, assuming active",
            coordinate
        );
        Resolution {
            last_activity: None,
            source: None,
            error: first_error,
        }
    }
}
