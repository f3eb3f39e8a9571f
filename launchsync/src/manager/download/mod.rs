//! Asset transfer for release installation.
//!
//! This module provides:
//! - Single-file HTTP downloads with temp-then-rename (`http`)
//! - Whole-archive SHA-256 verification (`checksum`)
//! - Progress reporting towards the presentation layer (`progress`)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use launchsync::manager::download::{HttpDownloader, NullProgress};
//! use launchsync::manager::AssetDownloader;
//!
//! let downloader = HttpDownloader::with_user_agent("launchsync/0.1.0")?;
//! downloader.download(
//!     "https://example.com/data.zip",
//!     Path::new("/tmp/data.zip"),
//!     0,
//!     &NullProgress,
//! )?;
//! ```

pub(crate) mod checksum;
mod http;
pub(crate) mod progress;

pub use checksum::{calculate_file_checksum, verify_checksum};
pub use http::{partial_path, HttpDownloader, DEFAULT_TIMEOUT_SECS};
pub use progress::{ChannelProgress, NullProgress, Progress, ProgressEvent, ProgressSink};
