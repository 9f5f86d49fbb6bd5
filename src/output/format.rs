//! Output formats and file naming

use crate::error::Error;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// File format for a written batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Header row plus one row per record
    Csv,
    /// Pretty-printed array of objects
    #[default]
    Json,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::invalid_argument(format!(
                "Unknown output format: {other} (expected csv or json)"
            ))),
        }
    }
}

/// Default file name: `{prefix}_{YYYYMMDD_HHMMSS}.{ext}`
pub fn timestamped_filename(prefix: &str, format: OutputFormat, now: DateTime<Utc>) -> String {
    format!(
        "{prefix}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}
