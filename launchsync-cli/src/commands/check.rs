//! Check command - compare the latest release with the installed one.

use indicatif::HumanBytes;

use super::InstallArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, RunnerOptions};

/// Run the check command.
pub fn run(args: InstallArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(RunnerOptions {
        install_dir: args.install_dir,
        verbose: args.verbose,
        ..RunnerOptions::default()
    })?;
    runner.log_startup("check");
    let app = runner.create_app()?;

    println!("Checking for updates...");
    let check = app.check()?;

    println!("Source:         {}", check.release_url);
    println!("Latest release: {}", check.latest.tag);
    println!(
        "Installed:      {}",
        check.installed_tag.as_deref().unwrap_or("(none)")
    );
    println!();
    println!("Assets:");
    for (name, asset) in &check.latest.assets {
        let size = if asset.size_bytes > 0 {
            HumanBytes(asset.size_bytes).to_string()
        } else {
            "unknown size".to_string()
        };
        println!("  {} ({})", name, size);
    }
    println!();

    if check.update_pending() {
        println!("Update available: run 'launchsync sync' to install it.");
    } else {
        println!("Release is up-to-date.");
    }

    Ok(())
}
