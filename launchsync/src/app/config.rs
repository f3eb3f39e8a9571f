//! Application configuration for `LauncherApp`.
//!
//! Combines the engine settings and the release source, built either
//! programmatically or from the user's configuration file.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{default_install_dir, ConfigFile};
use crate::manager::SyncConfig;
use crate::release::{default_user_agent, ReleaseSource};

/// Top-level configuration passed to `LauncherApp::new()`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Engine settings.
    pub sync: SyncConfig,

    /// Repository whose releases are installed.
    pub source: ReleaseSource,

    /// Launch anyway after a miscount.
    pub proceed_on_miscount: bool,
}

impl AppConfig {
    /// Configuration for `install_dir` with every other setting at its default.
    pub fn new(install_dir: PathBuf) -> Self {
        Self {
            sync: SyncConfig::new(install_dir),
            source: ReleaseSource::default(),
            proceed_on_miscount: false,
        }
    }

    /// Build from the configuration file.
    ///
    /// An unset install directory resolves to the platform default.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let install_dir = file
            .install
            .directory
            .clone()
            .unwrap_or_else(default_install_dir);

        let sync = SyncConfig::new(install_dir)
            .with_tree_asset(file.release.tree_asset.clone())
            .with_archive_asset(file.release.archive_asset.clone())
            .with_archive_sha256(file.install.archive_sha256.clone())
            .with_timeout(Duration::from_secs(file.network.timeout_secs));

        let source = ReleaseSource::new(file.release.owner.clone(), file.release.repo.clone())
            .with_api_url(file.release.api_url.clone())
            .with_user_agent(
                file.network
                    .user_agent
                    .clone()
                    .unwrap_or_else(default_user_agent),
            );

        Self {
            sync,
            source,
            proceed_on_miscount: file.install.proceed_on_miscount,
        }
    }

    /// Override the installation root.
    pub fn with_install_dir(mut self, install_dir: PathBuf) -> Self {
        self.sync.install_dir = install_dir;
        self
    }

    /// Override the miscount policy.
    pub fn with_proceed_on_miscount(mut self, proceed: bool) -> Self {
        self.proceed_on_miscount = proceed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.install.directory = Some(PathBuf::from("/opt/game"));
        file.install.proceed_on_miscount = true;
        file.release.repo = "other".to_string();
        file.network.timeout_secs = 15;
        file.network.user_agent = Some("custom/2".to_string());

        let config = AppConfig::from_config_file(&file);
        assert_eq!(config.sync.install_dir, PathBuf::from("/opt/game"));
        assert_eq!(config.sync.timeout, Duration::from_secs(15));
        assert_eq!(config.source.repo, "other");
        assert_eq!(config.source.user_agent, "custom/2");
        assert!(config.proceed_on_miscount);
    }

    #[test]
    fn test_unset_directory_uses_platform_default() {
        let config = AppConfig::from_config_file(&ConfigFile::default());
        assert_eq!(config.sync.install_dir, default_install_dir());
        assert!(config.source.user_agent.starts_with("launchsync/"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::new(PathBuf::from("/a"))
            .with_install_dir(PathBuf::from("/b"))
            .with_proceed_on_miscount(true);
        assert_eq!(config.sync.install_dir, PathBuf::from("/b"));
        assert!(config.proceed_on_miscount);
    }
}
