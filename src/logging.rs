// ABOUTME: Tracing setup — routes log output to a file so the TUI stays clean.
// ABOUTME: Filter comes from RUST_LOG, falling back to the configured level.

use std::fs;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program so buffered lines get flushed.
pub fn init(config: &Config) -> anyhow::Result<WorkerGuard> {
    let path = config.log_path();
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| config.data_dir());
    fs::create_dir_all(&dir).with_context(|| format!("creating log dir {}", dir.display()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "hookchat.log".into());
    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))?;

    Ok(guard)
}
