//! Sync command - bring the installation up to date and decide on launch.

use std::process::ExitCode;

use console::style;
use launchsync::launch::{LaunchDecision, Session};
use launchsync::manager::{ChannelProgress, SyncOutcome, SyncReport};

use super::InstallArgs;
use crate::error::CliError;
use crate::progress::ProgressRenderer;
use crate::runner::{CliRunner, RunnerOptions};

/// Process exit code for a terminal outcome.
pub fn exit_code(outcome: SyncOutcome) -> u8 {
    match outcome {
        SyncOutcome::Success => 0,
        SyncOutcome::Failure => 1,
        SyncOutcome::MiscountError => 2,
    }
}

/// Run the sync command.
///
/// With `force`, the installed tag is cleared first so the archive is
/// downloaded and extracted even when the release is current.
pub fn run(
    args: InstallArgs,
    proceed_on_miscount: bool,
    force: bool,
) -> Result<ExitCode, CliError> {
    let runner = CliRunner::new(RunnerOptions {
        install_dir: args.install_dir,
        proceed_on_miscount,
        persist_log: true,
        verbose: args.verbose,
    })?;
    runner.log_startup("sync");
    let app = runner.create_app()?;

    println!("Installation: {}", app.install_dir().display());
    println!(
        "Release:      {}/{}",
        runner.config().source.owner,
        runner.config().source.repo
    );
    println!();

    if force {
        app.forget_installed_release()?;
        println!("Forced reinstall: installed release tag cleared.");
        println!();
    }

    let (progress, mut events) = ChannelProgress::channel();
    let worker = app.spawn_sync(progress)?;
    ProgressRenderer::new().drain(&mut events);
    let report = worker.join().map_err(|_| CliError::WorkerPanicked)?;

    print_report(&report);

    let decision = app.launch_decision(report.outcome, &Session::offline());
    print_decision(decision);

    Ok(ExitCode::from(exit_code(report.outcome)))
}

fn print_report(report: &SyncReport) {
    let headline = match report.outcome {
        SyncOutcome::Success => style(report.last_message.as_str()).green().bold(),
        SyncOutcome::Failure => style(report.last_message.as_str()).red().bold(),
        SyncOutcome::MiscountError => style(report.last_message.as_str()).yellow().bold(),
    };
    println!("{}", headline);

    if let Some(tag) = &report.release_tag {
        println!("  Release tag:       {}", tag);
    }
    println!("  Archive downloads: {}", report.archive_downloads);

    if let Some(diff) = report.diff.as_ref().filter(|d| !d.is_clean()) {
        println!("  Files:             {}", diff.summary());
        for path in &diff.missing {
            println!("    - {}", path);
        }
        for path in &diff.unexpected {
            println!("    + {}", path);
        }
    }
}

fn print_decision(decision: LaunchDecision) {
    println!();
    match decision {
        LaunchDecision::Launch => println!("Ready to launch."),
        LaunchDecision::LaunchWithWarning => println!(
            "{} installed files do not match the release; launching anyway.",
            style("Warning:").yellow()
        ),
        LaunchDecision::Abort(reason) => {
            println!("{} {}", style("Launch aborted:").red(), reason.message())
        }
    }
}
