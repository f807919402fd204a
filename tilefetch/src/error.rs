//! Error types for tile fetching.

use thiserror::Error;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors surfaced by a single tile fetch.
///
/// Every variant is terminal for the call that produced it; nothing in this
/// crate retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with something other than 200 OK.
    #[error("GET {url}: {status}")]
    Download { url: String, status: String },

    /// The downloaded bytes are not a decodable image.
    #[error("Failed to decode tile image: {source}")]
    Decode {
        #[from]
        source: image::ImageError,
    },

    /// The User-Agent cannot be sent as an HTTP header value.
    #[error("Invalid User-Agent '{agent}': {reason}")]
    InvalidUserAgent { agent: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Returns the URL involved in the failure, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Transport { url, .. } | FetchError::Download { url, .. } => Some(url),
            FetchError::Decode { .. }
            | FetchError::InvalidUserAgent { .. }
            | FetchError::Client(_) => None,
        }
    }
}
