//! CSV and JSON file writers
//!
//! Both writers take an ordered batch of [`NormalizedRecord`]s. The CSV header
//! is the key order of the first record; JSON is an indented array.

use super::format::{timestamped_filename, OutputFormat};
use crate::error::{Error, Result};
use crate::types::{JsonValue, NormalizedRecord};
use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Render one value as a CSV cell
pub(crate) fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Streaming CSV writer with a header fixed by the first record
pub struct CsvWriter {
    writer: csv::Writer<File>,
    header: Option<Vec<String>>,
    rows_written: usize,
}

impl CsvWriter {
    /// Create the file; the header is written with the first record
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let writer = csv::Writer::from_path(path.as_ref()).map_err(|e| Error::Output {
            message: format!("Failed to create file {}: {e}", path.as_ref().display()),
        })?;

        Ok(Self {
            writer,
            header: None,
            rows_written: 0,
        })
    }

    /// Write one record as a row
    pub fn write(&mut self, record: &NormalizedRecord) -> Result<()> {
        if self.header.is_none() {
            let keys: Vec<String> = record.keys().cloned().collect();
            self.writer.write_record(&keys)?;
            self.header = Some(keys);
        }
        let header = self.header.as_deref().unwrap_or_default();

        if let Some(extra) = record.keys().find(|k| !header.contains(*k)) {
            return Err(Error::output(format!(
                "Record field '{extra}' is not in the CSV header"
            )));
        }

        let row: Vec<String> = header
            .iter()
            .map(|key| record.get(key).map(cell_text).unwrap_or_default())
            .collect();
        self.writer.write_record(&row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of data rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and close the file
    pub fn close(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}

/// Write a batch as CSV; an empty batch is [`Error::NoData`]
pub fn write_csv(records: &[NormalizedRecord], path: impl AsRef<Path>) -> Result<usize> {
    if records.is_empty() {
        return Err(Error::NoData);
    }

    let mut writer = CsvWriter::create(path)?;
    for record in records {
        writer.write(record)?;
    }
    writer.close()
}

/// Write a batch as a JSON array with 2-space indentation; an empty batch writes `[]`
pub fn write_json(records: &[NormalizedRecord], path: impl AsRef<Path>) -> Result<usize> {
    let file = File::create(path.as_ref()).map_err(|e| Error::Output {
        message: format!("Failed to create file {}: {e}", path.as_ref().display()),
    })?;

    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, records)?;
    out.flush()?;
    Ok(records.len())
}

/// Write a batch in the given format
pub fn write_records(
    format: OutputFormat,
    records: &[NormalizedRecord],
    path: impl AsRef<Path>,
) -> Result<usize> {
    match format {
        OutputFormat::Csv => write_csv(records, path),
        OutputFormat::Json => write_json(records, path),
    }
}

/// Write a batch into `dir`, creating it if needed.
///
/// Without an explicit `filename` the name is `{prefix}_{timestamp}.{ext}`.
/// Returns the path written.
pub fn save_records(
    records: &[NormalizedRecord],
    dir: impl AsRef<Path>,
    prefix: &str,
    format: OutputFormat,
    filename: Option<&str>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let name = filename.map_or_else(
        || timestamped_filename(prefix, format, Utc::now()),
        str::to_owned,
    );
    let path = dir.join(name);

    let rows = write_records(format, records, &path)?;
    info!("Saved {} records to {}", rows, path.display());
    Ok(path)
}
