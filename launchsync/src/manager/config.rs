//! Configuration for the sync engine.

use std::path::PathBuf;
use std::time::Duration;

use super::download::DEFAULT_TIMEOUT_SECS;

/// Name of the hidden bookkeeping directory inside the installation root.
///
/// Hidden entries are excluded from the actual tree, so nothing stored here
/// ever counts as an unexpected file.
pub const METADATA_DIR_NAME: &str = ".launcher";

/// File holding the installed release tag.
pub const STATE_FILE_NAME: &str = "release_info.txt";

/// Default name of the tree manifest asset.
pub const DEFAULT_TREE_ASSET: &str = "tree.txt";

/// Default name of the data archive asset.
pub const DEFAULT_ARCHIVE_ASSET: &str = "data.zip";

/// Configuration for a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Installation root kept in sync with the release.
    pub install_dir: PathBuf,

    /// Release asset holding the textual tree listing.
    pub tree_asset: String,

    /// Release asset holding the zip archive.
    pub archive_asset: String,

    /// Expected SHA-256 of the archive, checked before extraction when set.
    pub archive_sha256: Option<String>,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("."),
            tree_asset: DEFAULT_TREE_ASSET.to_string(),
            archive_asset: DEFAULT_ARCHIVE_ASSET.to_string(),
            archive_sha256: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SyncConfig {
    /// Create a new configuration with the given install directory.
    pub fn new(install_dir: PathBuf) -> Self {
        Self {
            install_dir,
            ..Default::default()
        }
    }

    /// Set the tree manifest asset name.
    pub fn with_tree_asset(mut self, name: impl Into<String>) -> Self {
        self.tree_asset = name.into();
        self
    }

    /// Set the archive asset name.
    pub fn with_archive_asset(mut self, name: impl Into<String>) -> Self {
        self.archive_asset = name.into();
        self
    }

    /// Pin the expected archive checksum.
    pub fn with_archive_sha256(mut self, checksum: Option<String>) -> Self {
        self.archive_sha256 = checksum.filter(|c| !c.trim().is_empty());
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The hidden bookkeeping directory.
    pub fn metadata_dir(&self) -> PathBuf {
        self.install_dir.join(METADATA_DIR_NAME)
    }

    /// Path of the installed-tag file.
    pub fn state_path(&self) -> PathBuf {
        self.metadata_dir().join(STATE_FILE_NAME)
    }

    /// Directory for the persistent log file.
    pub fn log_dir(&self) -> PathBuf {
        self.metadata_dir().join("logs")
    }

    /// The two assets every release must carry, tree manifest first.
    pub fn required_assets(&self) -> [String; 2] {
        [self.tree_asset.clone(), self.archive_asset.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.tree_asset, "tree.txt");
        assert_eq!(config.archive_asset, "data.zip");
        assert!(config.archive_sha256.is_none());
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SyncConfig::new(PathBuf::from("/games/launcher"))
            .with_tree_asset("listing.txt")
            .with_archive_asset("bundle.zip")
            .with_archive_sha256(Some("abc".to_string()))
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.install_dir, PathBuf::from("/games/launcher"));
        assert_eq!(config.required_assets(), ["listing.txt", "bundle.zip"]);
        assert_eq!(config.archive_sha256.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_blank_checksum_is_ignored() {
        let config = SyncConfig::default().with_archive_sha256(Some("  ".to_string()));
        assert!(config.archive_sha256.is_none());
    }

    #[test]
    fn test_derived_paths() {
        let config = SyncConfig::new(PathBuf::from("/root/install"));
        assert_eq!(config.metadata_dir(), PathBuf::from("/root/install/.launcher"));
        assert_eq!(
            config.state_path(),
            PathBuf::from("/root/install/.launcher/release_info.txt")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/root/install/.launcher/logs"));
    }
}
