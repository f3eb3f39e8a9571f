//! Expected and actual installation trees.
//!
//! - `parser` turns a `tree`-style listing into an [`ExpectedTree`]
//! - `actual` enumerates the files on disk into an [`ActualTree`]
//! - `diff` compares the two

mod actual;
mod diff;
mod parser;

pub use actual::ActualTree;
pub use diff::TreeDiff;
pub use parser::{parse, parse_file, parse_str, ExpectedTree};
