//! CLI error type.

use launchsync::app::AppError;
use launchsync::config::ConfigError;
use launchsync::manager::ManagerError;
use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Sync(#[from] ManagerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sync worker terminated unexpectedly")]
    WorkerPanicked,
}
