//! Logging configuration using tracing
//!
//! Toolchain output is the product (terminal text or NDJSON on stdout), so
//! diagnostics go to a daily log file instead and never interleave with it.

use std::ffi::OsString;
use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

const LOG_FILE_PREFIX: &str = "robotarium.log";

/// Filter directives, e.g. `debug` or `robotarium_toolchain=trace`
const LOG_ENV: &str = "ROBOTARIUM_LOG";

/// Overrides the log directory
const LOG_DIR_ENV: &str = "ROBOTARIUM_LOG_DIR";

/// Info for every workspace crate, warnings from dependencies.
const DEFAULT_FILTER: &str =
    "robotarium=info,robotarium_core=info,robotarium_toolchain=info,robotarium_app=info,warn";

/// Initialize the logging subsystem and return the log directory.
///
/// Logs are written to `<data_local_dir>/robotarium/logs/` unless
/// `ROBOTARIUM_LOG_DIR` is set.
///
/// # Examples
/// ```bash
/// ROBOTARIUM_LOG=debug robotarium run
/// ROBOTARIUM_LOG=robotarium_toolchain=trace robotarium devices
/// ROBOTARIUM_LOG_DIR=/tmp/robotarium robotarium init
/// ```
pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory(std::env::var_os(LOG_DIR_ENV));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| Error::config(format!("Failed to install logger: {}", e)))?;

    tracing::info!(
        "Robotarium {} starting, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    Ok(log_dir)
}

fn log_directory(override_dir: Option<OsString>) -> PathBuf {
    match override_dir.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("robotarium")
            .join("logs"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directory() {
        assert!(log_directory(None).ends_with("robotarium/logs"));
        assert!(log_directory(Some(OsString::new())).ends_with("robotarium/logs"));
    }

    #[test]
    fn test_log_directory_override() {
        let dir = log_directory(Some(OsString::from("/tmp/robotarium-logs")));
        assert_eq!(dir, PathBuf::from("/tmp/robotarium-logs"));
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
