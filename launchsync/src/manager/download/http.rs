//! HTTP-based asset downloader.
//!
//! Streams the response body to disk through a fixed-size buffer. There is no
//! resume support: every download starts from byte zero and replaces whatever
//! was at the destination.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use super::progress::{Progress, ProgressSink};
use crate::manager::error::{ManagerError, ManagerResult};
use crate::manager::traits::AssetDownloader;

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Suffix of the in-flight file written next to the destination.
const PARTIAL_SUFFIX: &str = ".part";

/// Path of the in-flight file used while downloading to `dest`.
///
/// A failed download leaves this file behind; callers remove it before retrying.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    dest.with_file_name(name)
}

/// HTTP asset downloader.
#[derive(Debug)]
pub struct HttpDownloader {
    client: Client,
    pub(crate) timeout: Duration,
}

impl HttpDownloader {
    /// Create a downloader that identifies itself with `user_agent`.
    pub fn new(user_agent: &str, timeout: Duration) -> ManagerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ManagerError::HttpClient(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Create a downloader with the default timeout.
    pub fn with_user_agent(user_agent: &str) -> ManagerResult<Self> {
        Self::new(user_agent, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Open the destination's partial file for writing, creating parents.
    fn prepare_destination(&self, dest: &Path) -> ManagerResult<(PathBuf, File)> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let partial = partial_path(dest);
        let file = File::create(&partial).map_err(|e| ManagerError::WriteFailed {
            path: partial.clone(),
            source: e,
        })?;
        Ok((partial, file))
    }

    /// Stream the response body into `file`, reporting progress.
    fn stream_download(
        &self,
        url: &str,
        mut response: reqwest::blocking::Response,
        file: File,
        partial: &Path,
        total_size: u64,
        progress: &dyn ProgressSink,
    ) -> ManagerResult<u64> {
        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut downloaded = 0u64;
        let mut last_fraction = 0.0f64;

        loop {
            let bytes_read =
                response
                    .read(&mut buffer)
                    .map_err(|e| ManagerError::DownloadFailed {
                        url: url.to_string(),
                        reason: format!("Read error: {}", e),
                    })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| ManagerError::WriteFailed {
                    path: partial.to_path_buf(),
                    source: e,
                })?;

            downloaded += bytes_read as u64;

            if let Progress::Fraction(fraction) = Progress::of(downloaded, total_size) {
                // Servers occasionally send more than advertised; never go backwards.
                if fraction >= last_fraction {
                    last_fraction = fraction;
                    progress.progress(Progress::Fraction(fraction));
                }
            }
        }

        writer.flush().map_err(|e| ManagerError::WriteFailed {
            path: partial.to_path_buf(),
            source: e,
        })?;

        Ok(downloaded)
    }
}

impl AssetDownloader for HttpDownloader {
    fn download(
        &self,
        locator: &str,
        dest: &Path,
        expected_size: u64,
        progress: &dyn ProgressSink,
    ) -> ManagerResult<u64> {
        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        info!(url = %locator, dest = %dest.display(), "Downloading asset");
        progress.text(&format!("Downloading {}...", file_name));

        let response = self
            .client
            .get(locator)
            .send()
            .map_err(|e| ManagerError::from_request(locator, e, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::HttpStatus {
                url: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let total_size = if expected_size > 0 {
            expected_size
        } else {
            response.content_length().unwrap_or(0)
        };

        if total_size == 0 {
            debug!(url = %locator, "Size unknown, reporting indeterminate progress");
            progress.progress(Progress::Indeterminate);
        } else {
            progress.progress(Progress::Fraction(0.0));
        }

        let (partial, file) = self.prepare_destination(dest)?;
        let bytes =
            self.stream_download(locator, response, file, &partial, total_size, progress)?;

        fs::rename(&partial, dest).map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        if total_size > 0 {
            progress.progress(Progress::Fraction(1.0));
        }
        progress.text(&format!("Downloaded {}", file_name));
        info!(url = %locator, bytes, "Download complete");

        Ok(bytes)
    }
}
