//! Configuration file support.
//!
//! Settings live in an INI file, by default
//! `<user config dir>/tilefetch/config.ini`:
//!
//! ```ini
//! [fetcher]
//! user_agent = my-renderer/1.0 (+https://example.org)
//! timeout_secs = 30
//!
//! [provider]
//! name = openstreetmap
//! ; a custom provider instead of a preset:
//! ; url_template = https://{s}.tiles.example.org/{z}/{x}/{y}.png
//! ; shards = a,b,c
//!
//! [cache]
//! enabled = true
//! ; path = /var/cache/tiles
//!
//! [logging]
//! level = info
//! ; file = /var/log/tilefetch.log
//! ```
//!
//! Missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, Properties};
use thiserror::Error;
use tracing::warn;

use crate::cache::CacheLocation;
use crate::error::FetchError;
use crate::fetcher::DEFAULT_USER_AGENT;
use crate::logging::LoggingConfig;
use crate::provider::{presets, ProviderError, TileProvider, DEFAULT_TIMEOUT_SECS};

/// Directory name under the user config directory.
pub const CONFIG_DIR_NAME: &str = "tilefetch";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "openstreetmap";

/// Errors from loading, saving or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: ini::Error },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("No user configuration directory on this platform")]
    NoConfigDir,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    HttpClient(#[from] FetchError),
}

/// Tile provider selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Preset name, or the name of the custom provider.
    pub name: String,
    /// Custom URL template; overrides the preset when set.
    pub url_template: Option<String>,
    /// Shards for the custom template.
    pub shards: Vec<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROVIDER.to_string(),
            url_template: None,
            shards: Vec::new(),
        }
    }
}

/// In-memory cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Key prefix; defaults to the per-provider user cache location.
    pub path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Everything needed to build a fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub provider: ProviderSettings,
    pub cache: CacheSettings,
    pub logging: LoggingConfig,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            provider: ProviderSettings::default(),
            cache: CacheSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FetcherConfig {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the default config file, falling back to defaults when it does
    /// not exist.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from an INI file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Parses configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("fetcher")) {
            if let Some(agent) = non_empty(section, "user_agent") {
                config.user_agent = agent.to_string();
            }
            if let Some(value) = non_empty(section, "timeout_secs") {
                let secs = value.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    section: "fetcher",
                    key: "timeout_secs",
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        section: "fetcher",
                        key: "timeout_secs",
                        value: value.to_string(),
                        reason: "must be greater than 0".to_string(),
                    });
                }
                config.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(section) = ini.section(Some("provider")) {
            if let Some(name) = non_empty(section, "name") {
                config.provider.name = name.to_string();
            }
            config.provider.url_template = non_empty(section, "url_template").map(String::from);
            if let Some(shards) = non_empty(section, "shards") {
                config.provider.shards = shards
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
        }

        if let Some(section) = ini.section(Some("cache")) {
            if let Some(value) = non_empty(section, "enabled") {
                config.cache.enabled =
                    parse_bool(value).ok_or_else(|| ConfigError::InvalidValue {
                        section: "cache",
                        key: "enabled",
                        value: value.to_string(),
                        reason: "expected true or false".to_string(),
                    })?;
            }
            config.cache.path = non_empty(section, "path").map(PathBuf::from);
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = non_empty(section, "level") {
                config.logging.level = level.to_string();
            }
            config.logging.file = non_empty(section, "file").map(PathBuf::from);
        }

        Ok(config)
    }

    /// Writes this configuration as INI, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut ini = Ini::new();
        ini.set_to(Some("fetcher"), "user_agent".into(), self.user_agent.clone());
        ini.set_to(
            Some("fetcher"),
            "timeout_secs".into(),
            self.timeout.as_secs().to_string(),
        );

        ini.set_to(Some("provider"), "name".into(), self.provider.name.clone());
        if let Some(ref template) = self.provider.url_template {
            ini.set_to(Some("provider"), "url_template".into(), template.clone());
        }
        if !self.provider.shards.is_empty() {
            ini.set_to(Some("provider"), "shards".into(), self.provider.shards.join(","));
        }

        ini.set_to(Some("cache"), "enabled".into(), self.cache.enabled.to_string());
        if let Some(ref dir) = self.cache.path {
            ini.set_to(Some("cache"), "path".into(), dir.to_string_lossy().into_owned());
        }

        ini.set_to(Some("logging"), "level".into(), self.logging.level.clone());
        if let Some(ref file) = self.logging.file {
            ini.set_to(Some("logging"), "file".into(), file.to_string_lossy().into_owned());
        }

        ini.write_to_file(path).map_err(write_err)
    }

    /// The configured provider: the custom template if set, else a preset.
    pub fn resolve_provider(&self) -> Result<TileProvider, ConfigError> {
        let provider = match self.provider.url_template {
            Some(ref template) => TileProvider::new(
                self.provider.name.as_str(),
                template.as_str(),
                self.provider.shards.clone(),
            ),
            None => presets::by_name(&self.provider.name)?,
        };
        provider.validate()?;
        Ok(provider)
    }

    /// Cache location for `provider`, or `None` when caching is disabled.
    pub fn cache_location(&self, provider: &TileProvider) -> Option<CacheLocation> {
        if !self.cache.enabled {
            return None;
        }
        match self.cache.path {
            Some(ref path) => Some(CacheLocation::from_path(path)),
            None => {
                let location = CacheLocation::user_cache(provider);
                if location.is_none() {
                    warn!(
                        provider = provider.name(),
                        "No user cache directory on this platform, tile caching disabled; set [cache] path"
                    );
                }
                location
            }
        }
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
