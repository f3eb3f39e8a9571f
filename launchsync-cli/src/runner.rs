//! Shared setup for commands that operate on an installation.
//!
//! Loads the configuration file, applies command-line overrides and installs
//! logging before any engine component is built.

use std::path::PathBuf;

use launchsync::app::{AppConfig, LauncherApp};
use launchsync::config::{config_file_path, ConfigFile};
use tracing::info;

use crate::error::CliError;
use crate::logging::{self, LoggingGuard};

/// Options common to installation commands.
#[derive(Debug, Default)]
pub struct RunnerOptions {
    /// Overrides `[install] directory`.
    pub install_dir: Option<PathBuf>,
    /// Launch after a miscount even if the config says otherwise.
    pub proceed_on_miscount: bool,
    /// Write the persistent log under the installation.
    pub persist_log: bool,
    /// Mirror all enabled events to stderr.
    pub verbose: bool,
}

/// Configuration and logging for one command invocation.
pub struct CliRunner {
    config: AppConfig,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load configuration and initialise logging.
    pub fn new(options: RunnerOptions) -> Result<Self, CliError> {
        let file = ConfigFile::load()?;
        let mut config = AppConfig::from_config_file(&file);
        if let Some(dir) = options.install_dir {
            config = config.with_install_dir(dir);
        }
        if options.proceed_on_miscount {
            config = config.with_proceed_on_miscount(true);
        }

        let log_dir = config.sync.log_dir();
        let logging = logging::init(
            &file.logging.level,
            options.persist_log.then_some(log_dir.as_path()),
            options.verbose,
        );

        Ok(Self {
            config,
            _logging: logging,
        })
    }

    /// Record which command started and with what settings.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            install_dir = %self.config.sync.install_dir.display(),
            config_file = %config_file_path().display(),
            "launchsync starting"
        );
    }

    /// Effective configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the production engine from the effective configuration.
    pub fn create_app(&self) -> Result<LauncherApp, CliError> {
        Ok(LauncherApp::new(self.config.clone())?)
    }
}
