//! Seams between the reconciler and its collaborators.
//!
//! The reconciler only talks to these traits, so tests can drive a full
//! sync run with in-memory fakes instead of a live release host.

use std::path::Path;

use super::download::ProgressSink;
use super::error::ManagerResult;

/// Transfers a located asset to local storage.
pub trait AssetDownloader: Send + Sync {
    /// Download `locator` to `dest`, overwriting anything already there.
    ///
    /// # Arguments
    ///
    /// * `locator` - URL of the asset
    /// * `dest` - Destination file path
    /// * `expected_size` - Advertised size in bytes, or 0 when unknown
    /// * `progress` - Receiver for byte-level progress
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    fn download(
        &self,
        locator: &str,
        dest: &Path,
        expected_size: u64,
        progress: &dyn ProgressSink,
    ) -> ManagerResult<u64>;
}

/// Unpacks a downloaded archive into a directory.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive_path` into `target_dir`.
    ///
    /// # Returns
    ///
    /// The number of file entries written.
    fn extract(
        &self,
        archive_path: &Path,
        target_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> ManagerResult<usize>;
}
