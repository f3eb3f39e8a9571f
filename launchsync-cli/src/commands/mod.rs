//! CLI command implementations.

pub mod check;
pub mod checksum;
pub mod config;
pub mod init;
pub mod status;
pub mod sync;
pub mod tree;
pub mod verify;

use std::path::PathBuf;

use clap::Args;

/// Arguments shared by commands that operate on an installation.
#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Installation directory (overrides the config file)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Show all log events on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
