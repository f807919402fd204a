//! Tile coordinates
//!
//! Provides the `zoom/x/y` tile address used throughout the crate and the
//! Web Mercator conversions between tiles and geographic coordinates.

mod types;

pub use types::{
    CoordError, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

impl TileCoord {
    /// Converts geographic coordinates to the tile containing them.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
    /// * `lon` - Longitude in degrees (-180.0 to 180.0)
    /// * `zoom` - Zoom level (0 to 22)
    pub fn from_lat_lon(lat: f64, lon: f64, zoom: u8) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }

        let n = 2.0_f64.powi(zoom as i32);
        let max_index = n - 1.0;

        // lon = 180.0 lands exactly on n, clamp back onto the last column
        let x = ((lon + 180.0) / 360.0 * n).floor().min(max_index);

        let lat_rad = lat.to_radians();
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
            .floor()
            .clamp(0.0, max_index);

        Ok(Self {
            zoom,
            x: x as i32,
            y: y as i32,
        })
    }

    /// Returns the latitude/longitude of the tile's north-west corner.
    pub fn to_lat_lon(&self) -> (f64, f64) {
        let n = 2.0_f64.powi(self.zoom as i32);

        let lon = self.x as f64 / n * 360.0 - 180.0;

        let y = self.y as f64 / n;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

        (lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let tile = TileCoord::from_lat_lon(40.7128, -74.0060, 16).unwrap();
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_zoom_zero_is_single_tile() {
        let tile = TileCoord::from_lat_lon(51.5, -0.12, 0).unwrap();
        assert_eq!(tile, TileCoord::new(0, 0, 0));
    }

    #[test]
    fn test_antimeridian_clamps_to_last_column() {
        let tile = TileCoord::from_lat_lon(0.0, 180.0, 2).unwrap();
        assert_eq!(tile.x, 3);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = TileCoord::from_lat_lon(90.0, 0.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = TileCoord::from_lat_lon(0.0, 181.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = TileCoord::from_lat_lon(0.0, 0.0, MAX_ZOOM + 1);
        assert_eq!(result, Err(CoordError::InvalidZoom(MAX_ZOOM + 1)));
    }

    #[test]
    fn test_to_lat_lon_northwest_corner() {
        let tile = TileCoord::new(16, 19295, 24640);
        let (lat, lon) = tile.to_lat_lon();

        assert!((lat - 40.713).abs() < 0.01, "Latitude should be close to 40.713");
        assert!((lon - (-74.007)).abs() < 0.01, "Longitude should be close to -74.007");
    }

    #[test]
    fn test_origin_tile_corner() {
        let (lat, lon) = TileCoord::new(0, 0, 0).to_lat_lon();
        assert!((lat - MAX_LAT).abs() < 1e-6);
        assert!((lon - MIN_LON).abs() < 1e-9);
    }
}
