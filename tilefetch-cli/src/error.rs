//! CLI error types.

use std::fmt;
use std::path::PathBuf;

use tilefetch::config::ConfigError;
use tilefetch::coord::CoordError;
use tilefetch::logging::LoggingError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Failed to load, save or apply configuration.
    Config(ConfigError),

    /// Failed to install the logger.
    Logging(LoggingError),

    /// Invalid geographic coordinates.
    Coord(CoordError),

    /// Failed to write an output image.
    SaveImage { path: PathBuf, reason: String },

    /// Some tiles could not be fetched.
    FetchFailed { failed: usize, total: usize },

    /// Refusing to overwrite an existing file.
    AlreadyExists(PathBuf),

    /// No config path given and no platform default.
    NoConfigPath,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Coord(e) => write!(f, "{}", e),
            CliError::SaveImage { path, reason } => {
                write!(f, "Failed to save {}: {}", path.display(), reason)
            }
            CliError::FetchFailed { failed, total } => {
                write!(f, "{} of {} tiles failed", failed, total)
            }
            CliError::AlreadyExists(path) => write!(
                f,
                "{} already exists (use --force to overwrite)",
                path.display()
            ),
            CliError::NoConfigPath => {
                write!(f, "No config directory found; pass --config <PATH>")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::SaveImage { .. }
            | CliError::FetchFailed { .. }
            | CliError::AlreadyExists(_)
            | CliError::NoConfigPath => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}
