//! Tile provider abstraction
//!
//! A [`TileProvider`] describes where tiles come from: a URL template with
//! `{s}`, `{z}`, `{x}` and `{y}` placeholders plus an ordered list of shard
//! labels substituted for `{s}`. Spreading requests across shard hostnames
//! lets the HTTP client open more parallel connections.
//!
//! # Sharding
//!
//! The shard for a tile is `shards[(x + y) mod len]` using Euclidean modulo,
//! so negative coordinates still select a valid shard:
//!
//! ```
//! use tilefetch::provider::TileProvider;
//!
//! let provider = TileProvider::new(
//!     "example",
//!     "https://{s}.tile.example.org/{z}/{x}/{y}.png",
//!     vec!["a".into(), "b".into(), "c".into()],
//! );
//! assert_eq!(provider.shard_for(4, 5), Some("a"));
//! assert_eq!(provider.shard_for(-1, 0), Some("c"));
//! ```

mod http;
pub mod presets;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};

#[cfg(test)]
pub use http::tests::{MockHttpClient, MockRequest, MockResponse};

use thiserror::Error;

use crate::coord::TileCoord;

/// Default edge length of a tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Problems with a provider definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The URL template lacks a required placeholder.
    #[error("URL template '{template}' is missing the {placeholder} placeholder")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },

    /// The template uses `{s}` but no shards are defined.
    #[error("URL template '{0}' uses {{s}} but the provider has no shards")]
    MissingShards(String),

    /// No preset with the given name.
    #[error("Unknown tile provider: {0}")]
    Unknown(String),
}

/// A source of map tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileProvider {
    name: String,
    attribution: String,
    tile_size: u32,
    url_template: String,
    shards: Vec<String>,
}

impl TileProvider {
    /// Creates a provider with the default tile size and no attribution.
    ///
    /// # Arguments
    ///
    /// * `name` - Short identifier, also used for cache locations
    /// * `url_template` - URL with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    /// * `shards` - Labels substituted for `{s}`, possibly empty
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        shards: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attribution: String::new(),
            tile_size: DEFAULT_TILE_SIZE,
            url_template: url_template.into(),
            shards,
        }
    }

    /// Sets the attribution text shown with rendered maps.
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    /// Sets the tile edge length in pixels.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn shards(&self) -> &[String] {
        &self.shards
    }

    /// Checks that the template can produce a URL for every tile.
    pub fn validate(&self) -> Result<(), ProviderError> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(ProviderError::MissingPlaceholder {
                    template: self.url_template.clone(),
                    placeholder,
                });
            }
        }

        if self.url_template.contains("{s}") && self.shards.is_empty() {
            return Err(ProviderError::MissingShards(self.url_template.clone()));
        }

        Ok(())
    }

    /// Selects the shard label for a tile.
    ///
    /// Returns `None` when the provider has no shards. The sum is computed in
    /// `i64` so extreme coordinates cannot overflow.
    pub fn shard_for(&self, x: i32, y: i32) -> Option<&str> {
        if self.shards.is_empty() {
            return None;
        }

        let count = self.shards.len() as i64;
        let index = (x as i64 + y as i64).rem_euclid(count) as usize;
        Some(&self.shards[index])
    }

    /// Substitutes shard, zoom and coordinates into the URL template.
    pub fn url(&self, shard: &str, zoom: u8, x: i32, y: i32) -> String {
        self.url_template
            .replace("{s}", shard)
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    /// Builds the request URL for a tile, including shard selection.
    pub fn tile_url(&self, tile: TileCoord) -> String {
        let shard = self.shard_for(tile.x, tile.y).unwrap_or("");
        self.url(shard, tile.zoom, tile.x, tile.y)
    }
}
