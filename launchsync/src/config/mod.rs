//! User configuration.
//!
//! - `file`: the persistent INI file and its sections
//! - `keys`: `section.key` addressing for the `config` command
//! - `paths`: platform default locations

mod file;
mod keys;
mod paths;

pub use file::{
    config_file_path, ConfigError, ConfigFile, InstallSettings, LoggingSettings, NetworkSettings,
    ReleaseSettings, CONFIG_PATH_ENV, DEFAULT_LOG_LEVEL,
};
pub use keys::ConfigKey;
pub use paths::{default_install_dir, Platform};
