//! Application error types.

use std::fmt;

use crate::config::ConfigError;
use crate::manager::ManagerError;

/// Errors that can occur while wiring or starting the engine.
#[derive(Debug)]
pub enum AppError {
    /// The configuration file could not be used.
    Config(ConfigError),

    /// An engine component could not be constructed.
    ClientCreation(ManagerError),

    /// The sync worker thread could not be started.
    WorkerSpawn(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::ClientCreation(e) => write!(f, "Failed to create sync engine: {}", e),
            AppError::WorkerSpawn(e) => write!(f, "Failed to start sync worker: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::ClientCreation(e) => Some(e),
            AppError::WorkerSpawn(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<ManagerError> for AppError {
    fn from(e: ManagerError) -> Self {
        AppError::ClientCreation(e)
    }
}
