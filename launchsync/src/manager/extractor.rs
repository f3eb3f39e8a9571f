//! Archive extraction for release installation.
//!
//! Unpacks the release's zip container into the installation root, entry by
//! entry. Existing files at the same paths are truncated and overwritten.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

use super::download::{Progress, ProgressSink};
use super::error::{ManagerError, ManagerResult};
use super::traits::ArchiveExtractor;

/// Buffer size for copying entry data (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Zip archive extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new zip extractor.
    pub fn new() -> Self {
        Self
    }

    /// Copy one entry's bytes to `dest`.
    ///
    /// Read failures (including CRC mismatches, which the zip reader reports
    /// at end of stream) are treated as archive corruption; write failures
    /// are local I/O errors.
    fn copy_entry(
        entry: &mut impl Read,
        archive_path: &Path,
        entry_name: &str,
        dest: &Path,
    ) -> ManagerResult<()> {
        let file = File::create(dest).map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let bytes_read = entry
                .read(&mut buffer)
                .map_err(|e| ManagerError::CorruptArchive {
                    path: archive_path.to_path_buf(),
                    reason: format!("failed to read entry '{}': {}", entry_name, e),
                })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| ManagerError::WriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
        }

        writer.flush().map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })
    }
}

fn create_dir(path: &Path) -> ManagerResult<()> {
    fs::create_dir_all(path).map_err(|e| ManagerError::CreateDirFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        target_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> ManagerResult<usize> {
        let file = File::open(archive_path).map_err(|e| ManagerError::ReadFailed {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

        let mut archive = ZipArchive::new(file).map_err(|e| ManagerError::CorruptArchive {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        create_dir(target_dir)?;

        let total = archive.len();
        let mut files_written = 0usize;
        info!(
            archive = %archive_path.display(),
            target = %target_dir.display(),
            entries = total,
            "Extracting archive"
        );

        for index in 0..total {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| ManagerError::CorruptArchive {
                    path: archive_path.to_path_buf(),
                    reason: format!("failed to open entry {}: {}", index, e),
                })?;

            let entry_name = entry.name().to_string();
            let relative = entry
                .enclosed_name()
                .ok_or_else(|| ManagerError::CorruptArchive {
                    path: archive_path.to_path_buf(),
                    reason: format!("entry '{}' escapes the target directory", entry_name),
                })?;
            let dest = target_dir.join(relative);

            progress.text(&format!("Extracting: {}", entry_name));

            if entry.is_dir() {
                create_dir(&dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    create_dir(parent)?;
                }
                Self::copy_entry(&mut entry, archive_path, &entry_name, &dest)?;
                files_written += 1;
                debug!(entry = %entry_name, "Extracted entry");
            }

            progress.progress(Progress::of(index as u64 + 1, total as u64));
        }

        info!(files = files_written, "Extraction complete");
        Ok(files_written)
    }
}
