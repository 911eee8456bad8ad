//! Logging setup for debugging and error tracking
//!
//! A TUI owns the terminal, so logs go to a file instead of stderr.

use crate::config::{Config, LoggingConfig};
use crate::constants::LOG_FILE_NAME;
use anyhow::{Context, Result};

/// Initialize file logging if enabled. Must be called at most once.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let path = match &config.file {
        Some(path) => path.clone(),
        None => Config::data_dir()?.join(LOG_FILE_NAME),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?)
        .apply()
        .context("Failed to install logger")?;

    log::info!("logging initialized");
    Ok(())
}
