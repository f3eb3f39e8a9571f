//! Error types for the sync engine.

use std::io;
use std::path::PathBuf;

/// Result type for sync engine operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Coarse classification of a [`ManagerError`].
///
/// The reconciler maps every kind to a terminal failure; the kind exists so
/// callers can tell a network outage from a broken archive without matching
/// on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Release endpoint or asset host unreachable, or a non-success status.
    Network,
    /// A required named asset is missing from the release.
    NotFound,
    /// Local file create/write/delete failure.
    Io,
    /// Archive stream unreadable or failing its integrity check.
    CorruptArchive,
    /// Tree manifest produced nothing to verify against.
    Manifest,
}

impl ErrorKind {
    /// Short lowercase label used in log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::NotFound => "not_found",
            Self::Io => "io",
            Self::CorruptArchive => "corrupt_archive",
            Self::Manifest => "manifest",
        }
    }
}

/// Errors that can occur while resolving, downloading, extracting or verifying a release.
#[derive(Debug)]
pub enum ManagerError {
    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or directory.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to remove a file or directory.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// Could not build the HTTP client.
    HttpClient(String),

    /// The request never produced a response.
    RequestFailed { url: String, reason: String },

    /// The server answered with a non-success status.
    HttpStatus { url: String, status: u16 },

    /// Network timeout.
    Timeout { url: String, timeout_secs: u64 },

    /// The response body broke off while streaming.
    DownloadFailed { url: String, reason: String },

    /// The release index could not be decoded.
    ReleaseParseFailed { url: String, reason: String },

    /// A required asset is not attached to the release.
    AssetNotFound { asset: String, tag: String },

    /// The archive could not be read.
    CorruptArchive { path: PathBuf, reason: String },

    /// Checksum verification failed.
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    /// The tree manifest listed no entries at all.
    EmptyTreeManifest { asset: String },

    /// Invalid path provided.
    InvalidPath(String),
}

impl ManagerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ReadFailed { .. }
            | Self::WriteFailed { .. }
            | Self::CreateDirFailed { .. }
            | Self::RemoveFailed { .. }
            | Self::InvalidPath(_) => ErrorKind::Io,
            Self::HttpClient(_)
            | Self::RequestFailed { .. }
            | Self::HttpStatus { .. }
            | Self::Timeout { .. }
            | Self::DownloadFailed { .. }
            | Self::ReleaseParseFailed { .. } => ErrorKind::Network,
            Self::AssetNotFound { .. } => ErrorKind::NotFound,
            Self::CorruptArchive { .. } | Self::ChecksumMismatch { .. } => {
                ErrorKind::CorruptArchive
            }
            Self::EmptyTreeManifest { .. } => ErrorKind::Manifest,
        }
    }

    /// Map a `reqwest` failure for `url` onto the network variants.
    pub(crate) fn from_request(url: &str, err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else {
            Self::RequestFailed {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            Self::HttpClient(msg) => write!(f, "failed to build HTTP client: {}", msg),
            Self::RequestFailed { url, reason } => {
                write!(f, "request to {} failed: {}", url, reason)
            }
            Self::HttpStatus { url, status } => {
                write!(f, "request to {} returned HTTP {}", url, status)
            }
            Self::Timeout { url, timeout_secs } => {
                write!(f, "request to {} timed out after {}s", url, timeout_secs)
            }
            Self::DownloadFailed { url, reason } => {
                write!(f, "failed to download {}: {}", url, reason)
            }
            Self::ReleaseParseFailed { url, reason } => {
                write!(f, "failed to parse release index from {}: {}", url, reason)
            }
            Self::AssetNotFound { asset, tag } => {
                write!(f, "asset '{}' not found in release {}", asset, tag)
            }
            Self::CorruptArchive { path, reason } => {
                write!(f, "corrupt archive {}: {}", path.display(), reason)
            }
            Self::ChecksumMismatch {
                filename,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "checksum mismatch for {}: expected {}, got {}",
                    filename, expected, actual
                )
            }
            Self::EmptyTreeManifest { asset } => {
                write!(f, "tree manifest {} is empty or unreadable", asset)
            }
            Self::InvalidPath(msg) => write!(f, "invalid path: {}", msg),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            Self::RemoveFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
