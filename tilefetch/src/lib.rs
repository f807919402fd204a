//! tilefetch - Map tile fetching with an in-memory cache
//!
//! This library downloads rectangular map tiles from slippy-map tile
//! providers, decodes them into images and keeps the raw encoded bytes in
//! memory so each tile is downloaded at most once per process.
//!
//! # Example
//!
//! ```no_run
//! use tilefetch::cache::CacheLocation;
//! use tilefetch::coord::TileCoord;
//! use tilefetch::fetcher::{CachingFetcher, TileFetcher};
//! use tilefetch::provider::{presets, ReqwestClient};
//!
//! let provider = presets::openstreetmap();
//! let location = CacheLocation::new("/tmp/tiles/osm");
//! let client = ReqwestClient::new().unwrap();
//! let fetcher = CachingFetcher::new(provider, client, Some(location));
//!
//! fetcher.set_user_agent("my-renderer/1.0");
//! let image = fetcher.fetch(TileCoord::new(3, 1, 2)).unwrap();
//! println!("{}x{}", image.width(), image.height());
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod provider;

pub use error::{FetchError, FetchResult};
