//! `tilefetch init`: write a default configuration file.

use std::path::Path;

use tilefetch::config::FetcherConfig;

use super::common::config_path;
use crate::error::CliError;

/// Run the init command.
pub fn run(path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = config_path(path)?;

    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path));
    }

    FetcherConfig::default().save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
