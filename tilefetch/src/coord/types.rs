//! Tile coordinate types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;

/// Lowest zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level accepted by the geographic conversions.
pub const MAX_ZOOM: u8 = 22;

/// A tile in the XYZ (slippy map) scheme.
///
/// The fetch path performs no range validation: callers that need it use
/// [`TileCoord::from_lat_lon`] or check against `2^zoom` themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// Column, west to east
    pub x: i32,
    /// Row, north to south
    pub y: i32,
}

impl TileCoord {
    /// Creates a tile coordinate.
    pub fn new(zoom: u8, x: i32, y: i32) -> Self {
        Self { zoom, x, y }
    }

    /// Number of tiles along each axis at this zoom level.
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.zoom.min(63)
    }

    /// Whether x and y fall inside the `0..2^zoom` grid.
    pub fn is_in_range(&self) -> bool {
        let n = self.tiles_per_axis();
        self.x >= 0 && self.y >= 0 && (self.x as u64) < n && (self.y as u64) < n
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = CoordError;

    /// Parses `zoom/x/y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 3 {
            return Err(CoordError::Parse(format!(
                "expected zoom/x/y, got '{}'",
                s
            )));
        }

        let zoom = parts[0]
            .parse::<u8>()
            .map_err(|e| CoordError::Parse(format!("invalid zoom '{}': {}", parts[0], e)))?;
        let x = parts[1]
            .parse::<i32>()
            .map_err(|e| CoordError::Parse(format!("invalid x '{}': {}", parts[1], e)))?;
        let y = parts[2]
            .parse::<i32>()
            .map_err(|e| CoordError::Parse(format!("invalid y '{}': {}", parts[2], e)))?;

        Ok(Self { zoom, x, y })
    }
}

/// Errors from coordinate conversion and parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between -85.05112878 and 85.05112878)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    #[error("Invalid zoom: {0} (must be between 0 and 22)")]
    InvalidZoom(u8),

    #[error("Invalid tile coordinate: {0}")]
    Parse(String),
}
