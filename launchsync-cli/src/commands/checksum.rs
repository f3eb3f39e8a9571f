//! Checksum command - SHA-256 of a data archive.

use std::path::Path;

use launchsync::manager::{calculate_file_checksum, verify_checksum};

use crate::error::CliError;

/// Run the checksum command.
pub fn run(file: &Path, expected: Option<&str>) -> Result<(), CliError> {
    match expected {
        None => {
            let digest = calculate_file_checksum(file)?;
            println!("{}  {}", digest, file.display());
        }
        Some(expected) => {
            verify_checksum(file, expected)?;
            println!("{}: OK", file.display());
        }
    }
    Ok(())
}
