//! HTTP seam for registry lookups.

use std::time::Duration;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Failure to obtain any response at all.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum HttpError {
    /// Connection, TLS, or timeout failure
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// No HTTP backend is compiled in
    #[error("HTTP client unavailable: {0}")]
    Unavailable(String),
}

/// Blocking GET client shared by every worker.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// Client that never reaches the network.
///
/// Used when the crate is built without the `registry` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpClient;

impl HttpClient for NoOpClient {
    fn get(&self, _url: &str) -> Result<HttpResponse, HttpError> {
        Err(HttpError::Unavailable(
            "built without the `registry` feature".to_string(),
        ))
    }
}

/// [`HttpClient`] backed by `reqwest`'s blocking client.
#[cfg(feature = "registry")]
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "registry")]
impl ReqwestClient {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| HttpError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "registry")]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let request_error = |e: reqwest::Error| HttpError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(url).send().map_err(request_error)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(request_error)?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// The default client for this build.
#[cfg(feature = "registry")]
pub fn default_client(timeout: Duration) -> Result<Box<dyn HttpClient>, HttpError> {
    Ok(Box::new(ReqwestClient::new(timeout)?))
}

/// The default client for this build.
#[cfg(not(feature = "registry"))]
pub fn default_client(_timeout: Duration) -> Result<Box<dyn HttpClient>, HttpError> {
    Ok(Box::new(NoOpClient))
}
