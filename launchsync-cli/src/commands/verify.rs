//! Verify command - compare installed files with the release listing.

use std::process::ExitCode;

use console::style;

use super::InstallArgs;
use crate::error::CliError;
use crate::progress::ProgressRenderer;
use crate::runner::{CliRunner, RunnerOptions};

/// Exit code when the installation does not match.
const MISMATCH_EXIT_CODE: u8 = 2;

/// Run the verify command. Nothing is repaired.
pub fn run(args: InstallArgs) -> Result<ExitCode, CliError> {
    let runner = CliRunner::new(RunnerOptions {
        install_dir: args.install_dir,
        persist_log: true,
        verbose: args.verbose,
        ..RunnerOptions::default()
    })?;
    runner.log_startup("verify");
    let app = runner.create_app()?;

    let renderer = ProgressRenderer::new();
    let result = app.verify(&renderer);
    renderer.finish();
    let diff = result?;

    if diff.is_clean() {
        println!("{} {}", style("All files verified.").green(), diff.summary());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", style("Mismatch:").yellow().bold(), diff.summary());
    if !diff.missing.is_empty() {
        println!();
        println!("Missing:");
        for path in &diff.missing {
            println!("  {}", path);
        }
    }
    if !diff.unexpected.is_empty() {
        println!();
        println!("Unexpected:");
        for path in &diff.unexpected {
            println!("  {}", path);
        }
    }

    Ok(ExitCode::from(MISMATCH_EXIT_CODE))
}
