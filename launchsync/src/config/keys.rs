//! Addressable configuration keys for `config get/set/list`.

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigError, ConfigFile};

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single `section.key` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ReleaseOwner,
    ReleaseRepo,
    ReleaseApiUrl,
    ReleaseTreeAsset,
    ReleaseArchiveAsset,
    InstallDirectory,
    InstallArchiveSha256,
    InstallProceedOnMiscount,
    NetworkTimeoutSecs,
    NetworkUserAgent,
    LoggingLevel,
}

const ALL_KEYS: [ConfigKey; 11] = [
    ConfigKey::ReleaseOwner,
    ConfigKey::ReleaseRepo,
    ConfigKey::ReleaseApiUrl,
    ConfigKey::ReleaseTreeAsset,
    ConfigKey::ReleaseArchiveAsset,
    ConfigKey::InstallDirectory,
    ConfigKey::InstallArchiveSha256,
    ConfigKey::InstallProceedOnMiscount,
    ConfigKey::NetworkTimeoutSecs,
    ConfigKey::NetworkUserAgent,
    ConfigKey::LoggingLevel,
];

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn invalid(key: ConfigKey, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.name(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(key: ConfigKey, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn non_empty(key: ConfigKey, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid(key, value, "must not be empty"));
    }
    Ok(value.to_string())
}

/// Blank clears an optional value.
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section holding this key.
    pub fn section(&self) -> &'static str {
        match self {
            Self::ReleaseOwner
            | Self::ReleaseRepo
            | Self::ReleaseApiUrl
            | Self::ReleaseTreeAsset
            | Self::ReleaseArchiveAsset => "release",
            Self::InstallDirectory
            | Self::InstallArchiveSha256
            | Self::InstallProceedOnMiscount => "install",
            Self::NetworkTimeoutSecs | Self::NetworkUserAgent => "network",
            Self::LoggingLevel => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            Self::ReleaseOwner => "owner",
            Self::ReleaseRepo => "repo",
            Self::ReleaseApiUrl => "api_url",
            Self::ReleaseTreeAsset => "tree_asset",
            Self::ReleaseArchiveAsset => "archive_asset",
            Self::InstallDirectory => "directory",
            Self::InstallArchiveSha256 => "archive_sha256",
            Self::InstallProceedOnMiscount => "proceed_on_miscount",
            Self::NetworkTimeoutSecs => "timeout_secs",
            Self::NetworkUserAgent => "user_agent",
            Self::LoggingLevel => "level",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::ReleaseOwner => config.release.owner.clone(),
            Self::ReleaseRepo => config.release.repo.clone(),
            Self::ReleaseApiUrl => config.release.api_url.clone(),
            Self::ReleaseTreeAsset => config.release.tree_asset.clone(),
            Self::ReleaseArchiveAsset => config.release.archive_asset.clone(),
            Self::InstallDirectory => config
                .install
                .directory
                .as_ref()
                .map(|d| d.to_string_lossy().to_string())
                .unwrap_or_default(),
            Self::InstallArchiveSha256 => config.install.archive_sha256.clone().unwrap_or_default(),
            Self::InstallProceedOnMiscount => config.install.proceed_on_miscount.to_string(),
            Self::NetworkTimeoutSecs => config.network.timeout_secs.to_string(),
            Self::NetworkUserAgent => config.network.user_agent.clone().unwrap_or_default(),
            Self::LoggingLevel => config.logging.level.clone(),
        }
    }

    /// Validate and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let key = *self;
        match self {
            Self::ReleaseOwner => config.release.owner = non_empty(key, value)?,
            Self::ReleaseRepo => config.release.repo = non_empty(key, value)?,
            Self::ReleaseApiUrl => {
                let url = non_empty(key, value)?;
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(invalid(key, value, "must be an http(s) URL"));
                }
                config.release.api_url = url;
            }
            Self::ReleaseTreeAsset => config.release.tree_asset = non_empty(key, value)?,
            Self::ReleaseArchiveAsset => config.release.archive_asset = non_empty(key, value)?,
            Self::InstallDirectory => config.install.directory = optional(value).map(PathBuf::from),
            Self::InstallArchiveSha256 => {
                let checksum = optional(value).map(|c| c.to_ascii_lowercase());
                if let Some(c) = &checksum {
                    if c.len() != 64 || !c.chars().all(|ch| ch.is_ascii_hexdigit()) {
                        return Err(invalid(key, value, "expected 64 hex characters"));
                    }
                }
                config.install.archive_sha256 = checksum;
            }
            Self::InstallProceedOnMiscount => {
                config.install.proceed_on_miscount = parse_bool(key, value)?
            }
            Self::NetworkTimeoutSecs => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a whole number of seconds"))?;
                if secs == 0 {
                    return Err(invalid(key, value, "must be greater than zero"));
                }
                config.network.timeout_secs = secs;
            }
            Self::NetworkUserAgent => config.network.user_agent = optional(value),
            Self::LoggingLevel => {
                let level = value.trim().to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid(key, value, "expected trace, debug, info, warn or error"));
                }
                config.logging.level = level;
            }
        }
        Ok(())
    }
}
