//! `tilefetch url` and `tilefetch locate`: show where a tile comes from.

use tilefetch::config::FetcherConfig;
use tilefetch::coord::TileCoord;

use super::common::resolve_provider;
use crate::error::CliError;

/// Print the request URL for a tile.
pub fn run_url(
    tile: TileCoord,
    provider: Option<String>,
    config: &FetcherConfig,
) -> Result<(), CliError> {
    let provider = resolve_provider(config, provider)?;
    println!("{}", provider.tile_url(tile));
    Ok(())
}

/// Convert a position to its tile and print it with the URL.
pub fn run_locate(
    lat: f64,
    lon: f64,
    zoom: u8,
    provider: Option<String>,
    config: &FetcherConfig,
) -> Result<(), CliError> {
    let provider = resolve_provider(config, provider)?;
    let tile = TileCoord::from_lat_lon(lat, lon, zoom)?;
    let (corner_lat, corner_lon) = tile.to_lat_lon();

    println!("Tile:   {}", tile);
    println!("Corner: {:.6}, {:.6}", corner_lat, corner_lon);
    println!("URL:    {}", provider.tile_url(tile));
    Ok(())
}
