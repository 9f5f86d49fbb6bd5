//! Tracing subscriber setup
//!
//! Console output always; a daily-rotated log file when enabled. The returned
//! [`WorkerGuard`] flushes the file writer and must live as long as the process.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Where and how much to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Level directive, e.g. `INFO` or `gamefetch=debug`
    pub level: String,
    /// Also write to a log file
    pub to_file: bool,
    /// Log file path; the date is appended on rotation
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            to_file: true,
            file: PathBuf::from("logs/pipeline.log"),
        }
    }
}

impl LogSettings {
    /// Filter from `RUST_LOG` if set, otherwise from the configured level
    pub fn env_filter(&self) -> Result<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        let level = match self.level.to_lowercase().as_str() {
            "warning" => "warn".to_string(),
            "critical" => "error".to_string(),
            other => other.to_string(),
        };
        EnvFilter::try_new(level).map_err(|e| Error::invalid_value("LOG_LEVEL", e.to_string()))
    }

    /// Directory and file-name prefix for the rolling appender
    fn file_parts(&self) -> (PathBuf, String) {
        let dir = self
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let name = self
            .file
            .file_name()
            .map_or_else(|| "pipeline.log".to_string(), |n| n.to_string_lossy().into_owned());
        (dir, name)
    }
}

/// Install the global subscriber.
///
/// Returns the file writer guard when file logging is enabled.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let filter = settings.env_filter()?;
    let console = fmt::layer().with_target(false);

    let (file_layer, guard) = if settings.to_file {
        let (dir, name) = settings.file_parts();
        std::fs::create_dir_all(&dir)?;

        let appender = tracing_appender::rolling::daily(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false).boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::config(format!("Failed to install logger: {e}")))?;

    if settings.to_file {
        tracing::info!("Logging to {}", settings.file.display());
    }
    Ok(guard)
}
