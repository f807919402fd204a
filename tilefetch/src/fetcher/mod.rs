//! Tile fetchers
//!
//! A [`TileFetcher`] turns a tile coordinate into a decoded image. Map
//! renderers call [`TileFetcher::fetch`] once per tile they need and
//! composite the results; they decide themselves whether a failed tile
//! aborts the render.
//!
//! [`CachingFetcher`] downloads over HTTP and keeps the encoded bytes in an
//! in-memory [`TileStore`](crate::cache::TileStore).

mod caching;

pub use caching::CachingFetcher;

use std::sync::Arc;

use image::DynamicImage;

use crate::coord::TileCoord;
use crate::error::FetchResult;

/// User-Agent sent until [`TileFetcher::set_user_agent`] is called.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0+(compatible; tilefetch/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Capability to fetch decoded tile images.
///
/// Implementations are shared across threads, so both methods take `&self`.
pub trait TileFetcher: Send + Sync {
    /// Replaces the User-Agent used for all subsequent downloads.
    ///
    /// Tiles already cached are unaffected.
    fn set_user_agent(&self, agent: &str);

    /// Returns the decoded image for `tile`.
    ///
    /// May populate a cache as a side effect. Performs at most one network
    /// round trip and never retries.
    fn fetch(&self, tile: TileCoord) -> FetchResult<DynamicImage>;
}

impl<T: TileFetcher + ?Sized> TileFetcher for &T {
    fn set_user_agent(&self, agent: &str) {
        (**self).set_user_agent(agent)
    }

    fn fetch(&self, tile: TileCoord) -> FetchResult<DynamicImage> {
        (**self).fetch(tile)
    }
}

impl<T: TileFetcher + ?Sized> TileFetcher for Box<T> {
    fn set_user_agent(&self, agent: &str) {
        (**self).set_user_agent(agent)
    }

    fn fetch(&self, tile: TileCoord) -> FetchResult<DynamicImage> {
        (**self).fetch(tile)
    }
}

impl<T: TileFetcher + ?Sized> TileFetcher for Arc<T> {
    fn set_user_agent(&self, agent: &str) {
        (**self).set_user_agent(agent)
    }

    fn fetch(&self, tile: TileCoord) -> FetchResult<DynamicImage> {
        (**self).fetch(tile)
    }
}
