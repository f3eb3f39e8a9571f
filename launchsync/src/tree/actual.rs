//! Enumeration of the files actually present under an installation root.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use walkdir::{DirEntry, WalkDir};

use crate::manager::error::{ManagerError, ManagerResult};

/// Files found on disk, as relative forward-slash paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActualTree {
    pub paths: BTreeSet<String>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Render `relative` with `/` separators regardless of platform.
fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl ActualTree {
    /// Walk `root` recursively and collect every regular file.
    ///
    /// Hidden entries are skipped together with everything below them, so the
    /// `.launcher` bookkeeping directory never shows up. Directories are not
    /// listed themselves. A missing root yields an empty tree.
    pub fn scan(root: &Path) -> ManagerResult<Self> {
        let mut paths = BTreeSet::new();
        if !root.exists() {
            return Ok(Self { paths });
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for entry in walker {
            let entry = entry.map_err(|e| ManagerError::ReadFailed {
                path: e.path().unwrap_or(root).to_path_buf(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(root) {
                paths.insert(to_slash_path(relative));
            }
        }

        Ok(Self { paths })
    }

    /// Number of files found.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when no files were found.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scan_collects_files_with_forward_slashes() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "mods/core.jar");
        touch(temp.path(), "config/keys/bindings.json");
        touch(temp.path(), "readme.md");
        fs::create_dir_all(temp.path().join("empty")).unwrap();

        let tree = ActualTree::scan(temp.path()).unwrap();
        let paths: Vec<&str> = tree.paths.iter().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec!["config/keys/bindings.json", "mods/core.jar", "readme.md"]
        );
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".cache");
        touch(temp.path(), ".launcher/release_info.txt");
        touch(temp.path(), "mods/.hidden.jar");
        touch(temp.path(), "mods/visible.jar");

        let tree = ActualTree::scan(temp.path()).unwrap();
        assert!(!tree.paths.contains(".cache"));
        assert_eq!(tree.paths.len(), 1);
        assert!(tree.paths.contains("mods/visible.jar"));
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let tree = ActualTree::scan(&temp.path().join("absent")).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_scan_hidden_root_is_still_walked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".game");
        touch(&root, "a.txt");

        let tree = ActualTree::scan(&root).unwrap();
        assert!(tree.paths.contains("a.txt"));
    }
}
