//! Tracing subscriber setup.
//!
//! Headless commands log to stderr. The terminal UI owns the screen, so it
//! logs to a daily rolling file instead.

use std::path::Path;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry::Registry};

use crate::error::AppError;

const LOG_FILE_PREFIX: &str = "autodash.log";

/// `RUST_LOG` wins; otherwise `info`, or `debug` when requested.
fn env_filter(debug: bool) -> EnvFilter {
    let fallback = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Console logging for `serve` and `report`.
pub fn init_stderr(debug: bool) -> Result<(), AppError> {
    Registry::default()
        .with(env_filter(debug))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| AppError::runtime(format!("Failed to initialize logging: {e}")))
}

/// File logging for the TUI. Keep the guard alive until exit so buffered
/// lines are flushed.
pub fn init_file(log_dir: &Path, debug: bool) -> Result<WorkerGuard, AppError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        AppError::usage(format!("Failed to create log directory {}: {e}", log_dir.display()))
    })?;

    let appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    Registry::default()
        .with(env_filter(debug))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .try_init()
        .map_err(|e| AppError::runtime(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}
