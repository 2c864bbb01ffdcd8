//! File-based tracing setup.
//!
//! The terminal belongs to the UI, so logs go to `pomofocus.log` under the
//! state directory. `POMOFOCUS_LOG` takes precedence over the `-v` count.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

pub const LOG_ENV: &str = "POMOFOCUS_LOG";
pub const LOG_FILE: &str = "pomofocus.log";

/// Maps a `-v` count to a tracing directive.
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize logging into the default state directory.
///
/// The returned guard must be held until exit so buffered lines are flushed.
/// Returns `None` (and logs nothing) if the directory can't be created.
pub fn init(verbosity: u8) -> Option<WorkerGuard> {
    let dir = AppDirs::log_dir()?;
    init_in(&dir, verbosity)
}

pub fn init_in(dir: &Path, verbosity: u8) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(verbosity >= 2)
        .try_init();

    Some(guard)
}
