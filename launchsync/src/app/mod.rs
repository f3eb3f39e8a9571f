//! Application bootstrap.
//!
//! `LauncherApp` owns the production sync engine and exposes the operations
//! a launcher shell needs: full sync on a worker thread, verification,
//! update checks, local status and the launch decision.
//!
//! # Example
//!
//! ```ignore
//! use launchsync::app::{AppConfig, LauncherApp};
//! use launchsync::config::ConfigFile;
//!
//! let file = ConfigFile::load()?;
//! let app = LauncherApp::new(AppConfig::from_config_file(&file))?;
//! let status = app.status()?;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{InstallStatus, LauncherApp, ProductionReconciler, UpdateCheck};
pub use config::AppConfig;
pub use error::AppError;
