//! Tree command - show what a tree listing expects to be installed.

use std::path::Path;

use launchsync::tree;

use crate::error::CliError;

/// Run the tree command.
pub fn run(file: &Path) -> Result<(), CliError> {
    let expected = tree::parse_file(file)?;

    for path in &expected.paths {
        println!("{}", path);
    }
    println!();
    println!(
        "{} files ({} entries in listing)",
        expected.paths.len(),
        expected.total_entry_count
    );

    Ok(())
}
