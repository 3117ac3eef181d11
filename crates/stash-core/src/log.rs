//! Tracing subscriber setup with a size-capped log file.
//!
//! When file logging is enabled, logs are written to
//! `~/.config/stash/logs/stash.log`. Once the file reaches the configured
//! max size it is rotated to `stash.log.1` (one backup kept). Otherwise
//! logs go to stderr.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "stash.log";
const BACKUP_FILE_NAME: &str = "stash.log.1";
const MAX_BACKUPS: usize = 1;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "trace", "debug", "info", "warn", or "error".
    /// Any `EnvFilter` directive is accepted.
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

impl LogConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn max_bytes(&self) -> u64 {
        self.max_file_mb.max(1) * 1024 * 1024
    }
}

/// Returns the log directory: `~/.config/stash/logs/`.
pub fn log_dir() -> Option<PathBuf> {
    crate::config::config_dir().map(|d| d.join("logs"))
}

/// Installs the global tracing subscriber. Call once at startup.
///
/// File output goes through a background writer; keep the returned guard
/// alive until exit so buffered lines are flushed. Falls back to stderr
/// when the log file cannot be opened. Calling it again after a
/// subscriber is installed does nothing.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let appender = config.enabled.then(log_dir).flatten().and_then(|dir| {
        file_appender(&dir, config.max_bytes())
            .inspect_err(|e| eprintln!("Warning: could not open log file in {}: {e}", dir.display()))
            .ok()
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(false);

    match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_ansi(false).with_writer(writer).try_init().ok()?;
            Some(guard)
        }
        None => {
            let _ = builder.with_writer(io::stderr).try_init();
            None
        }
    }
}

/// Opens `stash.log` in `dir`, rolling it over once it reaches `max_bytes`.
fn file_appender(dir: &Path, max_bytes: u64) -> io::Result<BasicRollingFileAppender> {
    fs::create_dir_all(dir)?;
    BasicRollingFileAppender::new(
        dir.join(LOG_FILE_NAME),
        RollingConditionBasic::new().max_size(max_bytes),
        MAX_BACKUPS,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn log_file_rotates_while_writing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let max_bytes = 4 * 1024;
        let (writer, guard) =
            tracing_appender::non_blocking(file_appender(dir.path(), max_bytes).unwrap());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(writer)
            .finish();
        let line = "x".repeat(200);

        // Act
        tracing::subscriber::with_default(subscriber, || {
            for _ in 0..100 {
                tracing::info!("{line}");
            }
        });
        drop(guard);

        // Assert
        let current = fs::metadata(dir.path().join(LOG_FILE_NAME)).unwrap().len();
        assert!(current < 2 * max_bytes, "log grew to {current} bytes");
        assert!(dir.path().join(BACKUP_FILE_NAME).exists());
        assert!(!dir.path().join("stash.log.2").exists());
    }

    #[test]
    fn oversized_log_rolls_on_first_write() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOG_FILE_NAME), vec![b'x'; 64]).unwrap();
        let mut appender = file_appender(dir.path(), 32).unwrap();

        // Act
        appender.write_all(b"fresh\n").unwrap();
        appender.flush().unwrap();

        // Assert
        let backup = fs::metadata(dir.path().join(BACKUP_FILE_NAME)).unwrap();
        assert_eq!(backup.len(), 64);
        let current = fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(current, "fresh\n");
    }

    #[test]
    fn appender_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        let mut appender = file_appender(&logs, 1024).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        assert!(logs.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn zero_size_cap_is_raised_to_one_megabyte() {
        let config = LogConfig {
            max_file_mb: 0,
            ..Default::default()
        };

        assert_eq!(config.max_bytes(), 1024 * 1024);
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        let config = LogConfig {
            level: "stash=loud".into(),
            ..Default::default()
        };

        assert_eq!(config.filter().to_string(), "info");
    }
}
