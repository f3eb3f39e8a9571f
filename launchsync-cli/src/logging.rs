//! Tracing subscriber setup.
//!
//! Events go to two places: stderr (warnings only unless `--verbose`) and,
//! for commands that touch the installation, an append-only log file at
//! `<install_dir>/.launcher/logs/launcher.log`.

use std::io;
use std::path::Path;

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, time::OffsetTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// File name of the persistent log.
pub const LOG_FILE_NAME: &str = "launcher.log";

/// Keeps the background log writer alive; drop flushes it.
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

fn local_timer() -> OffsetTime<Rfc3339> {
    OffsetTime::local_rfc_3339().unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339))
}

/// `RUST_LOG` when set, otherwise the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn open_log_file(log_dir: &Path) -> io::Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
        .map_err(io::Error::other)
}

/// Install the global subscriber.
///
/// A log directory that cannot be created only disables the file layer.
pub fn init(level: &str, log_dir: Option<&Path>, verbose: bool) -> LoggingGuard {
    let timer = local_timer();

    let (file_writer, guard) = match log_dir.map(open_log_file) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("warning: file logging disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_timer(timer.clone())
    });

    let stderr_level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_timer(timer)
        .with_filter(stderr_level);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .with(stderr_layer)
        .init();

    LoggingGuard { _file: guard }
}
