//! In-memory tile cache.
//!
//! Raw encoded tile bytes are stored under a [`CacheKey`] derived from a
//! [`CacheLocation`] and the tile coordinate. The key looks like a path but
//! nothing in this module touches the filesystem.
//!
//! # Components
//!
//! - [`CacheLocation`]: names a cache and prefixes its keys
//! - [`CacheKey`]: `{path}/{zoom}/{x}/{y}`
//! - [`TileStore`]: storage seam, implemented by [`MemoryTileStore`]
//!
//! # Example
//!
//! ```
//! use tilefetch::cache::{CacheKey, CacheLocation, MemoryTileStore, TileStore};
//! use tilefetch::coord::TileCoord;
//!
//! let location = CacheLocation::new("/tmp/cache");
//! let key = CacheKey::new(&location, TileCoord::new(3, 1, 2));
//! assert_eq!(key.as_str(), "/tmp/cache/3/1/2");
//!
//! let store = MemoryTileStore::new();
//! store.set(key.clone(), vec![1, 2, 3]).unwrap();
//! assert_eq!(store.get(&key), Some(vec![1, 2, 3]));
//! ```

mod key;
mod memory;
mod traits;

pub use key::{CacheKey, CacheLocation, CACHE_DIR_NAME};
pub use memory::MemoryTileStore;
pub use traits::{CacheStats, StoreError, TileStore};
