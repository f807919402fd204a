//! tilefetch CLI - Command-line interface
//!
//! Fetches map tiles through the tilefetch library, prints tile URLs and
//! manages the configuration file.

mod commands;
mod error;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tilefetch::config::FetcherConfig;
use tilefetch::coord::TileCoord;
use tilefetch::logging::{self, LoggingGuard};

use commands::common::load_config;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilefetch")]
#[command(version, about = "Fetch and cache map tiles from slippy-map providers")]
struct Cli {
    /// Config file (default: <config dir>/tilefetch/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download tiles and save them as PNG
    Fetch(commands::fetch::FetchArgs),

    /// Print the request URL for a tile
    Url {
        /// Tile as zoom/x/y
        #[arg(allow_hyphen_values = true)]
        tile: TileCoord,

        /// Tile provider preset
        #[arg(long)]
        provider: Option<String>,
    },

    /// Find the tile containing a latitude/longitude
    Locate {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Zoom level
        #[arg(long)]
        zoom: u8,

        /// Tile provider preset
        #[arg(long)]
        provider: Option<String>,
    },

    /// List built-in tile providers
    Providers,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, force),
        Commands::Fetch(args) => {
            let (config, _logging) = setup(config_path, cli.verbose)?;
            commands::fetch::run(args, config)
        }
        Commands::Url { tile, provider } => {
            let (config, _logging) = setup(config_path, cli.verbose)?;
            commands::url::run_url(tile, provider, &config)
        }
        Commands::Locate {
            lat,
            lon,
            zoom,
            provider,
        } => {
            let (config, _logging) = setup(config_path, cli.verbose)?;
            commands::url::run_locate(lat, lon, zoom, provider, &config)
        }
        Commands::Providers => {
            let (config, _logging) = setup(config_path, cli.verbose)?;
            commands::providers::run(&config);
            Ok(())
        }
    }
}

/// Loads configuration and installs logging for commands that need them.
fn setup(
    config_path: Option<&Path>,
    verbose: u8,
) -> Result<(FetcherConfig, LoggingGuard), CliError> {
    let config = load_config(config_path)?;
    let guard = logging::init(&config.logging.clone().with_verbosity(verbose))?;
    Ok((config, guard))
}
