//! HTTP client abstraction for testability

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::StatusCode;

use crate::error::{FetchError, FetchResult};

/// Default timeout for tile requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs a single blocking HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `user_agent` - Value sent in the `User-Agent` header
    ///
    /// # Returns
    ///
    /// The full response body, or an error if the request failed or the
    /// status was not 200.
    fn get(&self, url: &str, user_agent: &str) -> FetchResult<Vec<u8>>;
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn get(&self, url: &str, user_agent: &str) -> FetchResult<Vec<u8>> {
        (**self).get(url, user_agent)
    }
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> FetchResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wraps a preconfigured reqwest client (proxies, TLS roots, pools).
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, user_agent: &str) -> FetchResult<Vec<u8>> {
        let agent = HeaderValue::from_str(user_agent).map_err(|e| FetchError::InvalidUserAgent {
            agent: user_agent.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, agent)
            .send()
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        // Only 200 counts; the response is dropped here on every other status
        if response.status() != StatusCode::OK {
            return Err(FetchError::Download {
                url: url.to_string(),
                status: response.status().to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: format!("Failed to read response: {}", e),
            })
    }
}
