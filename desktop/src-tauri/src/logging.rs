//! Logging setup with file rotation.

use std::path::{Path, PathBuf};

use jasper_config::LoggingConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const LOG_FILE_PREFIX: &str = "jasper-desktop";
const LOG_FILES_KEPT: usize = 7;

/// Setup logging with console and rotating file output.
///
/// # Log Layers
/// - Console: Human-readable, colored output
/// - File: plain text, daily rotation, 7-day retention
///
/// `RUST_LOG` takes precedence over the configured level. Records from the
/// `log` facade (used by the library crates) are bridged into tracing.
///
/// Returns the logs directory.
pub fn setup_logging(
    data_dir: &Path,
    config: &LoggingConfig,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)?;

    // Console layer - human readable for development
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(LOG_FILES_KEPT)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(&logs_dir)?;

    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(logs_dir)
}
