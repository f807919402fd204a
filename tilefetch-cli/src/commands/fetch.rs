//! `tilefetch fetch`: download tiles and save them as PNG.

use std::path::{Path, PathBuf};

use clap::Args;
use tilefetch::config::FetcherConfig;
use tilefetch::coord::TileCoord;
use tilefetch::fetcher::{CachingFetcher, TileFetcher};
use tracing::{error, info};

use super::common::apply_provider_override;
use crate::error::CliError;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Tiles to fetch as zoom/x/y, e.g. 12/2138/1420
    #[arg(required = true, allow_hyphen_values = true)]
    pub tiles: Vec<TileCoord>,

    /// Tile provider preset (see `tilefetch providers`)
    #[arg(long)]
    pub provider: Option<String>,

    /// User-Agent sent with each request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Disable the in-memory cache
    #[arg(long)]
    pub no_cache: bool,

    /// Directory for the decoded PNG files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

/// Output file for a tile: `<dir>/<provider>-<z>-<x>-<y>.png`.
pub fn output_path(dir: &Path, provider: &str, tile: TileCoord) -> PathBuf {
    dir.join(format!(
        "{}-{}-{}-{}.png",
        provider, tile.zoom, tile.x, tile.y
    ))
}

/// Run the fetch command.
pub fn run(args: FetchArgs, mut config: FetcherConfig) -> Result<(), CliError> {
    apply_provider_override(&mut config, args.provider);
    if let Some(agent) = args.user_agent {
        config.user_agent = agent;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    let fetcher = CachingFetcher::from_config(&config)?;
    let provider_name = fetcher.provider().name().to_string();

    std::fs::create_dir_all(&args.output_dir).map_err(|e| CliError::SaveImage {
        path: args.output_dir.clone(),
        reason: e.to_string(),
    })?;

    let total = args.tiles.len();
    let mut failed = 0;

    for tile in args.tiles {
        match fetcher.fetch(tile) {
            Ok(image) => {
                let path = output_path(&args.output_dir, &provider_name, tile);
                image.save(&path).map_err(|e| CliError::SaveImage {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                info!(tile = %tile, path = %path.display(), "Saved tile");
                println!("{} -> {}", tile, path.display());
            }
            Err(e) => {
                error!(tile = %tile, error = %e, "Failed to fetch tile");
                eprintln!("{}: {}", tile, e);
                failed += 1;
            }
        }
    }

    if let Some(stats) = fetcher.cache_stats() {
        println!("Cache: {}", stats);
    }

    if failed > 0 {
        return Err(CliError::FetchFailed { failed, total });
    }
    Ok(())
}
