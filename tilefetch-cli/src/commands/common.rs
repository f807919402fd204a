//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use tilefetch::config::FetcherConfig;
use tilefetch::provider::TileProvider;

use crate::error::CliError;

/// Loads the config from `path`, or the default location when `None`.
pub fn load_config(path: Option<&Path>) -> Result<FetcherConfig, CliError> {
    let config = match path {
        Some(path) => FetcherConfig::load(path)?,
        None => FetcherConfig::load_or_default()?,
    };
    Ok(config)
}

/// Resolves the config path for writing.
pub fn config_path(path: Option<&Path>) -> Result<PathBuf, CliError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => FetcherConfig::default_path().ok_or(CliError::NoConfigPath),
    }
}

/// Applies a `--provider` override. A named preset replaces any custom
/// template from the config file.
pub fn apply_provider_override(config: &mut FetcherConfig, provider: Option<String>) {
    if let Some(name) = provider {
        config.provider.name = name;
        config.provider.url_template = None;
        config.provider.shards.clear();
    }
}

/// Resolves the provider with an optional `--provider` override.
pub fn resolve_provider(
    config: &FetcherConfig,
    provider: Option<String>,
) -> Result<TileProvider, CliError> {
    let mut config = config.clone();
    apply_provider_override(&mut config, provider);
    Ok(config.resolve_provider()?)
}
