//! Logging setup
//!
//! Installs a global tracing subscriber writing to a daily log file. The
//! terminal is taken by the status line, so nothing is logged to stdout.
//! Old log files are pruned to a bounded count.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use super::config::APP_DIR_NAME;

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "RECORD_PLAY_LOG";

/// Maximum number of log files to retain
const MAX_LOG_FILES: usize = 7;
const LOG_FILE_PREFIX: &str = "record-play.log";

/// Keeps the background log writer alive; dropping it flushes pending lines
#[must_use = "logs are lost once the guard is dropped"]
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Errors that may occur while initializing logging
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No suitable data directory available for logs")]
    NoDataDir,

    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// `<data dir>/record-play/logs`
pub fn default_log_dir() -> Result<PathBuf, LoggingError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
        .ok_or(LoggingError::NoDataDir)
}

/// Initialize tracing into `log_dir`.
///
/// The filter comes from `RECORD_PLAY_LOG`, else `default_filter`.
/// Hold the returned guard until exit. Only the first call in a process
/// can install the subscriber. Failures are returned so callers can run
/// without logs.
pub fn init(log_dir: &Path, default_filter: &str) -> Result<LogGuard, LoggingError> {
    fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;
    if let Err(e) = prune_old_logs(log_dir, MAX_LOG_FILES) {
        eprintln!("Warning: {}", e);
    }

    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, worker) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(file_writer);

    let subscriber = Registry::default()
        .with(build_env_filter(default_filter))
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(LogGuard { _worker: worker })
}

fn build_env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Remove the oldest log files beyond `max_files`
fn prune_old_logs(dir: &Path, max_files: usize) -> Result<usize, LoggingError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX))
        })
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|(modified, _)| *modified);
    let excess = entries.len().saturating_sub(max_files);
    let mut removed = 0;
    for (_, path) in entries.into_iter().take(excess) {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("Warning: failed to remove old log {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}
