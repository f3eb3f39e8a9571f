//! Parser for `tree`-style directory listings.
//!
//! A listing looks like the output of the `tree` utility:
//!
//! ```text
//! .
//! ├── config
//! │   └── options.txt
//! └── mods
//!     ├── core.jar
//!     └── extra.jar
//! ```
//!
//! Hierarchy is encoded only by the width of the leading padding, four
//! characters per level. The parser keeps a stack of directory names indexed
//! by depth and rebuilds each file's relative path from it.
//!
//! Classification is by name alone: anything ending in a dot-extension is a
//! file, a bare name without any dot is a directory. A directory whose name
//! contains a dot is therefore never used as a path prefix for its children.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::manager::error::{ManagerError, ManagerResult};

/// Characters per indentation level.
const INDENT_WIDTH: usize = 4;

/// Entry markers: a branch and a last-branch connector.
const CONNECTORS: [&str; 2] = ["├──", "└──"];

/// Line consisting of the root marker only.
const ROOT_MARKER: &str = ".";

/// The set of files a correct installation must contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedTree {
    /// Relative, forward-slash separated file paths.
    pub paths: BTreeSet<String>,
    /// Number of listed entries, files and directories alike.
    pub total_entry_count: u32,
}

impl ExpectedTree {
    /// True when the listing yielded neither paths nor entries.
    ///
    /// Such a manifest cannot be verified against and is treated as unreadable.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.total_entry_count == 0
    }
}

/// How an entry name is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
    /// Counted, but neither emitted nor used as a prefix.
    Other,
}

fn file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+\.[A-Za-z0-9]+$").unwrap())
}

fn directory_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+$").unwrap())
}

fn classify(name: &str) -> EntryKind {
    if file_pattern().is_match(name) {
        EntryKind::File
    } else if directory_pattern().is_match(name) && !name.contains('.') {
        EntryKind::Directory
    } else {
        EntryKind::Other
    }
}

/// Leading indentation: spaces, vertical bars, and the no-break spaces some
/// `tree` builds emit in non-C locales.
fn is_padding(c: char) -> bool {
    matches!(c, ' ' | '│' | '\u{a0}')
}

/// Incremental state while walking the listing.
#[derive(Debug, Default)]
struct TreeBuilder {
    stack: Vec<String>,
    tree: ExpectedTree,
}

impl TreeBuilder {
    fn push_line(&mut self, raw: &str) {
        let line = raw.trim_start_matches('\u{feff}').trim_end();

        // Lines holding nothing but padding carry no information and must not
        // reset the depth stack.
        if line.chars().all(is_padding) || line == ROOT_MARKER {
            return;
        }

        let (padding_bytes, padding_chars) = line
            .char_indices()
            .take_while(|(_, c)| is_padding(*c))
            .fold((0, 0), |(_, n), (i, c)| (i + c.len_utf8(), n + 1));
        let depth = padding_chars / INDENT_WIDTH;
        self.stack.truncate(depth);

        let rest = &line[padding_bytes..];
        let Some(name) = CONNECTORS.iter().find_map(|c| rest.strip_prefix(c)) else {
            return;
        };
        self.tree.total_entry_count += 1;

        let name = name.trim();
        match classify(name) {
            EntryKind::File => {
                let path = self
                    .stack
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(name))
                    .collect::<Vec<_>>()
                    .join("/");
                self.tree.paths.insert(path);
            }
            EntryKind::Directory => self.stack.push(name.to_string()),
            EntryKind::Other => {}
        }
    }

    fn finish(self) -> ExpectedTree {
        self.tree
    }
}

/// Parse a listing held in memory.
pub fn parse_str(text: &str) -> ExpectedTree {
    let mut builder = TreeBuilder::default();
    for line in text.lines() {
        builder.push_line(line);
    }
    builder.finish()
}

/// Parse a listing from a reader.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn parse(mut reader: impl BufRead) -> io::Result<ExpectedTree> {
    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        builder.push_line(&String::from_utf8_lossy(&buf));
    }
    Ok(builder.finish())
}

/// Parse a listing stored on disk.
pub fn parse_file(path: &Path) -> ManagerResult<ExpectedTree> {
    let read_failed = |e| ManagerError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::open(path).map_err(read_failed)?;
    parse(BufReader::new(file)).map_err(read_failed)
}
