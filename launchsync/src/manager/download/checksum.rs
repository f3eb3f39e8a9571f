//! Archive digest check.
//!
//! A release may pin the SHA-256 of its data archive in the configuration.
//! The staged archive is hashed before extraction and rejected on mismatch.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::manager::error::{ManagerError, ManagerResult};

/// Hex-encoded SHA-256 of the file at `path`, in lowercase.
pub fn calculate_file_checksum(path: &Path) -> ManagerResult<String> {
    let read_failed = |source: io::Error| ManagerError::ReadFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_failed)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(read_failed)?;

    Ok(hex_digest(&hasher.finalize()))
}

/// Check the file at `path` against a hex digest.
///
/// Surrounding whitespace in `expected` is ignored, as is hex letter case.
pub fn verify_checksum(path: &Path, expected: &str) -> ManagerResult<()> {
    let expected = expected.trim();
    let actual = calculate_file_checksum(path)?;
    if actual.eq_ignore_ascii_case(expected) {
        return Ok(());
    }

    Err(ManagerError::ChecksumMismatch {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        expected: expected.to_string(),
        actual,
    })
}

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// SHA-256 of the ASCII bytes `abc`.
    const ABC_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn staged(temp: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_digest_of_known_input() {
        let temp = TempDir::new().unwrap();
        let archive = staged(&temp, "data.zip", b"abc");

        assert_eq!(calculate_file_checksum(&archive).unwrap(), ABC_DIGEST);
    }

    #[test]
    fn test_digest_of_zero_length_archive() {
        let temp = TempDir::new().unwrap();
        let archive = staged(&temp, "data.zip", b"");

        assert_eq!(
            calculate_file_checksum(&archive).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_streamed_digest_matches_in_memory_digest() {
        let temp = TempDir::new().unwrap();
        let contents: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
        let archive = staged(&temp, "data.zip", &contents);

        let expected = hex_digest(&Sha256::digest(&contents));
        assert_eq!(calculate_file_checksum(&archive).unwrap(), expected);
    }

    #[test]
    fn test_missing_archive_is_read_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("data.zip");

        let err = calculate_file_checksum(&missing).unwrap_err();
        assert!(matches!(err, ManagerError::ReadFailed { ref path, .. } if *path == missing));
    }

    #[test]
    fn test_pinned_digest_tolerates_case_and_padding() {
        let temp = TempDir::new().unwrap();
        let archive = staged(&temp, "data.zip", b"abc");

        verify_checksum(&archive, &format!("  {}\n", ABC_DIGEST.to_uppercase())).unwrap();
    }

    #[test]
    fn test_wrong_pinned_digest_reports_both_values() {
        let temp = TempDir::new().unwrap();
        let archive = staged(&temp, "data.zip", b"abd");

        match verify_checksum(&archive, ABC_DIGEST) {
            Err(ManagerError::ChecksumMismatch {
                filename,
                expected,
                actual,
            }) => {
                assert_eq!(filename, "data.zip");
                assert_eq!(expected, ABC_DIGEST);
                assert_ne!(actual, ABC_DIGEST);
                assert_eq!(actual.len(), 64);
            }
            other => panic!("expected a digest mismatch, got {:?}", other),
        }
    }
}
