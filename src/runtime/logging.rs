use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};

/// Route `tracing` output to the log file. The terminal belongs to the UI,
/// so when no file can be opened logging is simply off.
///
/// The returned guard flushes buffered lines on drop; keep it alive until
/// shutdown.
pub fn init_logging(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let path = settings.file.clone().or_else(config::default_log_path)?;
    let dir = path.parent()?;
    let file_name = path.file_name()?;
    fs::create_dir_all(dir).ok()?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .ok()?;

    Some(guard)
}
