//! Status command - describe the local installation without network access.

use launchsync::config::{config_file_path, Platform};

use super::InstallArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, RunnerOptions};

/// Run the status command.
pub fn run(args: InstallArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(RunnerOptions {
        install_dir: args.install_dir,
        verbose: args.verbose,
        ..RunnerOptions::default()
    })?;
    runner.log_startup("status");
    let app = runner.create_app()?;
    let status = app.status()?;

    println!("Platform:      {}", Platform::current().name());
    println!("Config file:   {}", config_file_path().display());
    println!("Installation:  {}", status.install_dir.display());
    println!(
        "Installed tag: {}",
        status.installed_tag.as_deref().unwrap_or("(none)")
    );
    println!(
        "First launch:  {}",
        if status.first_launch { "yes" } else { "no" }
    );

    Ok(())
}
