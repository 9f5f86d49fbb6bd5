//! Output module
//!
//! Persists a fetched batch to disk.
//!
//! # Overview
//!
//! - CSV with a header row taken from the first record's keys
//! - JSON array of objects, UTF-8, 2-space indentation
//! - Timestamped default file names (`prefix_YYYYMMDD_HHMMSS.ext`)
//!
//! An empty batch is an error for CSV ([`crate::Error::NoData`]) but writes
//! `[]` for JSON.

mod format;
mod writer;

pub use format::{timestamped_filename, OutputFormat};
pub use writer::{save_records, write_csv, write_json, write_records, CsvWriter};

#[cfg(test)]
mod tests;
