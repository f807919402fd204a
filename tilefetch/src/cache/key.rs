//! Cache locations and keys.

use std::fmt;
use std::path::Path;

use crate::coord::TileCoord;
use crate::provider::TileProvider;

/// Directory name under the user cache directory.
pub const CACHE_DIR_NAME: &str = "tilefetch";

/// Identifies a tile cache.
///
/// Only [`path`](CacheLocation::path) is used, as the prefix of every
/// [`CacheKey`]. The path is never read or written here; a disk-backed
/// store could use the same keys as file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheLocation {
    path: String,
}

impl CacheLocation {
    /// Creates a location from any path-like string.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a location from a filesystem path.
    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }

    /// Conventional per-provider location: `<user cache dir>/tilefetch/<provider>`.
    ///
    /// Returns `None` when the platform has no user cache directory.
    pub fn user_cache(provider: &TileProvider) -> Option<Self> {
        let dir = dirs::cache_dir()?
            .join(CACHE_DIR_NAME)
            .join(provider.name());
        Some(Self::from_path(&dir))
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for CacheLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Key of a cached tile: `{path}/{zoom}/{x}/{y}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(location: &CacheLocation, tile: TileCoord) -> Self {
        Self(format!(
            "{}/{}/{}/{}",
            location.path(),
            tile.zoom,
            tile.x,
            tile.y
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
