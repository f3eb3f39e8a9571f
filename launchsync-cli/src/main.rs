//! LaunchSync CLI - keeps a launcher installation in sync with its latest
//! published release.

mod commands;
mod error;
mod logging;
mod progress;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::InstallArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "launchsync", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download, verify and repair the installation
    Sync {
        #[command(flatten)]
        install: InstallArgs,

        /// Launch even if installed files do not match the release
        #[arg(long)]
        proceed_on_miscount: bool,

        /// Download and extract the archive even if the release is current
        #[arg(long)]
        force: bool,
    },

    /// Show the installed release without contacting the server
    Status {
        #[command(flatten)]
        install: InstallArgs,
    },

    /// Check whether a newer release is available
    Check {
        #[command(flatten)]
        install: InstallArgs,
    },

    /// Compare installed files with the release listing, without repairing
    Verify {
        #[command(flatten)]
        install: InstallArgs,
    },

    /// Print the files a tree listing expects
    Tree {
        /// Tree listing file
        file: PathBuf,
    },

    /// Compute or verify the SHA-256 of a file
    Checksum {
        /// File to hash
        file: PathBuf,

        /// Expected hex digest
        #[arg(long, value_name = "HEX")]
        expected: Option<String>,
    },

    /// Create the configuration file with detected defaults
    Init,

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn dispatch(command: Commands) -> Result<ExitCode, CliError> {
    match command {
        Commands::Sync {
            install,
            proceed_on_miscount,
            force,
        } => commands::sync::run(install, proceed_on_miscount, force),
        Commands::Status { install } => commands::status::run(install).map(|_| ExitCode::SUCCESS),
        Commands::Check { install } => commands::check::run(install).map(|_| ExitCode::SUCCESS),
        Commands::Verify { install } => commands::verify::run(install),
        Commands::Tree { file } => commands::tree::run(&file).map(|_| ExitCode::SUCCESS),
        Commands::Checksum { file, expected } => {
            commands::checksum::run(&file, expected.as_deref()).map(|_| ExitCode::SUCCESS)
        }
        Commands::Init => commands::init::run().map(|_| ExitCode::SUCCESS),
        Commands::Config { command } => commands::config::run(command).map(|_| ExitCode::SUCCESS),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_flags() {
        let cli = Cli::try_parse_from([
            "launchsync",
            "sync",
            "--install-dir",
            "/opt/game",
            "--proceed-on-miscount",
        ])
        .unwrap();

        match cli.command {
            Commands::Sync {
                install,
                proceed_on_miscount,
                force,
            } => {
                assert_eq!(install.install_dir, Some(PathBuf::from("/opt/game")));
                assert!(proceed_on_miscount);
                assert!(!force);
                assert!(!install.verbose);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_sync_force() {
        let cli = Cli::try_parse_from(["launchsync", "sync", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sync {
                force: true,
                proceed_on_miscount: false,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_checksum_expected() {
        let cli = Cli::try_parse_from(["launchsync", "checksum", "data.zip", "--expected", "ab"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Checksum { expected: Some(ref e), .. } if e == "ab"
        ));
    }
}
