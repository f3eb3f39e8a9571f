//! Persistent INI configuration file.
//!
//! Located at `<config dir>/launchsync/config.ini` unless the
//! `LAUNCHSYNC_CONFIG` environment variable points elsewhere. A missing file
//! is equivalent to all defaults.
//!
//! ```ini
//! [release]
//! owner = Breach-In-The-Containment
//! repo = get-mods
//!
//! [install]
//! directory = /home/player/.breachinthecontainment/launcher
//! proceed_on_miscount = false
//!
//! [network]
//! timeout_secs = 300
//!
//! [logging]
//! level = info
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::keys::ConfigKey;
use crate::manager::download::DEFAULT_TIMEOUT_SECS;
use crate::manager::{DEFAULT_ARCHIVE_ASSET, DEFAULT_TREE_ASSET};
use crate::release::{DEFAULT_API_URL, DEFAULT_OWNER, DEFAULT_REPO};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "LAUNCHSYNC_CONFIG";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors reading, writing or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `[release]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSettings {
    pub owner: String,
    pub repo: String,
    pub api_url: String,
    pub tree_asset: String,
    pub archive_asset: String,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            tree_asset: DEFAULT_TREE_ASSET.to_string(),
            archive_asset: DEFAULT_ARCHIVE_ASSET.to_string(),
        }
    }
}

/// `[install]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSettings {
    /// Installation root; the platform default when unset.
    pub directory: Option<PathBuf>,
    /// Pinned SHA-256 of the data archive.
    pub archive_sha256: Option<String>,
    /// Launch anyway after a miscount.
    pub proceed_on_miscount: bool,
}

/// `[network]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub timeout_secs: u64,
    /// Overrides the default `launchsync/<version>` agent.
    pub user_agent: Option<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub release: ReleaseSettings,
    pub install: InstallSettings,
    pub network: NetworkSettings,
    pub logging: LoggingSettings,
}

/// Location of the configuration file.
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("launchsync")
        .join("config.ini")
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_ini(&ini)
    }

    /// Build from parsed INI, validating every known key present.
    ///
    /// Unknown sections and keys are ignored.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Render as INI, omitting unset optional values.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_failed = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        self.to_ini().write_to_file(path).map_err(write_failed)
    }
}
