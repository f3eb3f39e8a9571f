//! Comparison of expected and actual file sets.

use super::actual::ActualTree;
use super::parser::ExpectedTree;

/// Outcome of comparing an installation against its manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// Listed in the manifest but absent on disk.
    pub missing: Vec<String>,
    /// Present on disk but not listed.
    pub unexpected: Vec<String>,
    /// Number of files the manifest lists.
    pub expected_count: usize,
    /// Number of files found on disk.
    pub actual_count: usize,
}

impl TreeDiff {
    /// Compare the two sets.
    pub fn compute(expected: &ExpectedTree, actual: &ActualTree) -> Self {
        Self {
            missing: expected.paths.difference(&actual.paths).cloned().collect(),
            unexpected: actual.paths.difference(&expected.paths).cloned().collect(),
            expected_count: expected.paths.len(),
            actual_count: actual.paths.len(),
        }
    }

    /// True when the installation matches exactly.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.unexpected.is_empty()
            && self.expected_count == self.actual_count
    }

    /// One-line description for logs and status text.
    pub fn summary(&self) -> String {
        format!(
            "{} missing, {} unexpected ({} expected, {} found)",
            self.missing.len(),
            self.unexpected.len(),
            self.expected_count,
            self.actual_count
        )
    }
}
