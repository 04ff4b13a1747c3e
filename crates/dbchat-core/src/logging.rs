//! File logging for the TUI.
//!
//! The TUI owns the terminal, so diagnostics must never hit stdout/stderr.
//! Logs go to ${DBCHAT_HOME}/logs/dbchat.log, filtered by RUST_LOG.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::paths;

/// Initializes file logging and returns the appender guard.
///
/// The guard must be held for the lifetime of the process; dropping it
/// flushes and stops the background writer.
pub fn init() -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, "dbchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
