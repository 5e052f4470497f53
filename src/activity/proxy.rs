//! Module proxy lookups (`/@v/<version>.info`).

use super::http::HttpClient;
use super::{ActivityStrategy, ResolutionOutcome};
use crate::model::{ActivitySource, DependencyCoordinate};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// Proxy used when no usable endpoint is configured.
pub const DEFAULT_PROXY: &str = "https://proxy.golang.org";

/// Environment variable consulted when no proxy list is configured.
pub const PROXY_ENV: &str = "GOPROXY";

/// Body of a version `.info` document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyInfo {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
}

/// Split a `GOPROXY`-style list into HTTP endpoints.
///
/// Entries are trimmed and lose a trailing `/`; empty and `direct` entries are
/// dropped. An empty result yields [`DEFAULT_PROXY`].
#[must_use]
pub fn parse_proxy_list(raw: &str) -> Vec<String> {
    let endpoints: Vec<String> = raw
        .split(',')
        .map(|entry| entry.trim().trim_end_matches('/'))
        .filter(|entry| !entry.is_empty() && *entry != "direct")
        .map(str::to_string)
        .collect();

    if endpoints.is_empty() {
        vec![DEFAULT_PROXY.to_string()]
    } else {
        endpoints
    }
}

/// Endpoint list from the configured value, else `GOPROXY`, else the default.
#[must_use]
pub fn resolve_proxy_list(configured: Option<&str>) -> Vec<String> {
    match configured {
        Some(raw) => parse_proxy_list(raw),
        None => parse_proxy_list(&std::env::var(PROXY_ENV).unwrap_or_default()),
    }
}

/// Escape a module path for use in a proxy URL.
#[must_use]
pub fn escape_module_path(path: &str) -> String {
    escape(path, true)
}

/// Escape a version for use in a proxy URL.
#[must_use]
pub fn escape_version(version: &str) -> String {
    escape(version, false)
}

fn escape(input: &str, keep_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_uppercase() {
            out.push('!');
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii_alphanumeric()
            || matches!(ch, '-' | '.' | '_' | '~' | '!')
            || (keep_slash && ch == '/')
        {
            out.push(ch);
        } else {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// URL of the `.info` document for a coordinate on one endpoint.
#[must_use]
pub fn info_url(endpoint: &str, coordinate: &DependencyCoordinate) -> String {
    format!(
        "{endpoint}/{}/@v/{}.info",
        escape_module_path(&coordinate.path),
        escape_version(&coordinate.version)
    )
}

/// Looks up a version's publish time on each proxy endpoint in turn.
pub struct RegistryProxyStrategy {
    endpoints: Vec<String>,
    client: Arc<dyn HttpClient>,
}

impl RegistryProxyStrategy {
    #[must_use]
    pub fn new(endpoints: Vec<String>, client: Arc<dyn HttpClient>) -> Self {
        Self { endpoints, client }
    }

    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

impl ActivityStrategy for RegistryProxyStrategy {
    fn name(&self) -> &'static str {
        "registry-proxy"
    }

    fn source(&self) -> ActivitySource {
        ActivitySource::Registry
    }

    fn resolve(&self, coordinate: &DependencyCoordinate) -> ResolutionOutcome {
        let mut decode_failure: Option<String> = None;

        for endpoint in &self.endpoints {
            let url = info_url(endpoint, coordinate);
            tracing::debug!(%url, "querying module proxy");

            match self.client.get(&url) {
                Ok(resp) if resp.is_ok() => match serde_json::from_slice::<ProxyInfo>(&resp.body) {
                    Ok(info) => return ResolutionOutcome::Found(info.time),
                    Err(e) => {
                        tracing::debug!("Undecodable response from {}: {}", endpoint, e);
                        decode_failure =
                            Some(format!("invalid version info from {endpoint}: {e}"));
                    }
                },
                Ok(resp) => {
                    tracing::debug!("{} returned {} for {}", endpoint, resp.status, coordinate);
                }
                Err(e) => tracing::debug!("{}", e),
            }
        }

        match decode_failure {
            Some(detail) => ResolutionOutcome::Error(detail),
            None => ResolutionOutcome::Unavailable(format!(
                "no proxy returned version info for {coordinate}"
            )),
        }
    }
}
