//! Init command - write a configuration file with detected defaults.

use launchsync::config::{config_file_path, default_install_dir, ConfigFile, Platform};

use crate::error::CliError;

/// Run the init command.
///
/// Existing settings are kept; only an unset install directory is filled in.
pub fn run() -> Result<(), CliError> {
    let mut config = ConfigFile::load().unwrap_or_default();

    match &config.install.directory {
        Some(dir) => {
            println!("Install directory already configured:");
            println!("  {}", dir.display());
        }
        None => {
            let dir = default_install_dir();
            println!("Default install directory for {}:", Platform::current().name());
            println!("  {}", dir.display());
            config.install.directory = Some(dir);
        }
    }
    println!();

    config.save()?;

    println!("Configuration file: {}", config_file_path().display());
    println!();
    println!("Edit this file or use 'launchsync config set' to customize settings.");
    println!("Command-line arguments override config file values when specified.");
    Ok(())
}
