//! Tracing setup.
//!
//! - Console: compact format, filtered by `RUST_LOG` (default `info,sms_relay=debug,tower_http=debug`)
//! - File: `ERROR` events only, appended to the configured error log

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,sms_relay=debug,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("error log path {0:?} has no file name")]
    InvalidPath(PathBuf),

    #[error("failed to open error log {path:?}: {source}")]
    Appender {
        path: PathBuf,
        #[source]
        source: InitError,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// The returned guard flushes the error log on drop and must be kept alive
/// for the lifetime of the process.
pub fn init(error_log: &Path) -> Result<WorkerGuard, LoggingError> {
    let file_name = error_log
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(error_log.to_path_buf()))?;
    let directory = match error_log.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|source| LoggingError::Appender {
            path: error_log.to_path_buf(),
            source,
        })?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_filter(env_filter);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
