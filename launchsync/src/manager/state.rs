//! Persisted installed-release tag.
//!
//! A single scalar stored under the installation's hidden bookkeeping
//! directory. It is the idempotency anchor for sync runs and is only ever
//! written after a verified installation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::config::{METADATA_DIR_NAME, STATE_FILE_NAME};
use super::error::{ManagerError, ManagerResult};

/// Reader/writer for the installed release tag.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store for the installation rooted at `install_dir`.
    pub fn new(install_dir: &Path) -> Self {
        Self {
            path: install_dir.join(METADATA_DIR_NAME).join(STATE_FILE_NAME),
        }
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the installed tag.
    ///
    /// A missing or blank file yields `None`.
    pub fn read(&self) -> ManagerResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let tag = contents.trim();
                Ok((!tag.is_empty()).then(|| tag.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ManagerError::ReadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Persist `tag`, replacing any previous value.
    pub fn write(&self, tag: &str) -> ManagerResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let tmp = self.path.with_extension("txt.tmp");
        fs::write(&tmp, tag).map_err(|e| ManagerError::WriteFailed {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| ManagerError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(tag, path = %self.path.display(), "Installed tag written");
        Ok(())
    }

    /// Remove the state file, if present.
    pub fn clear(&self) -> ManagerResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ManagerError::RemoveFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Whether the installation at `install_dir` has never completed a sync.
///
/// True when the root itself or the state file is absent.
pub fn is_first_launch(install_dir: &Path) -> bool {
    !install_dir.is_dir() || !StateStore::new(install_dir).path().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());

        store.write("v1.4.0").unwrap();
        assert_eq!(store.read().unwrap(), Some("v1.4.0".to_string()));
        assert!(store.path().starts_with(temp.path().join(".launcher")));

        store.write("v1.5.0").unwrap();
        assert_eq!(store.read().unwrap(), Some("v1.5.0".to_string()));
        assert!(!store.path().with_extension("txt.tmp").exists());
    }

    #[test]
    fn test_read_trims_and_blank_is_none() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        fs::write(store.path(), "  v2\r\n").unwrap();
        assert_eq!(store.read().unwrap(), Some("v2".to_string()));

        fs::write(store.path(), "\n  \n").unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_read_directory_in_place_of_file_is_error() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());
        fs::create_dir_all(store.path()).unwrap();

        assert!(matches!(store.read(), Err(ManagerError::ReadFailed { .. })));
    }

    #[test]
    fn test_clear() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());
        store.clear().unwrap();
        store.write("v1").unwrap();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_is_first_launch() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("install");
        assert!(is_first_launch(&root));

        fs::create_dir_all(&root).unwrap();
        assert!(is_first_launch(&root));

        StateStore::new(&root).write("v1").unwrap();
        assert!(!is_first_launch(&root));
    }
}
