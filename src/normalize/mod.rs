//! Normalization module
//!
//! Maps one raw catalog payload (nested objects and lists) to a flat
//! [`NormalizedRecord`].
//!
//! # Overview
//!
//! - [`RawgNormalizer`] and [`IgdbNormalizer`] are the two profiles, one per
//!   upstream API, both behind the [`Normalizer`] trait
//! - [`ListStyle`] selects comma-joined strings (CSV) or arrays (JSON) for
//!   list-of-object fields
//! - Records without a truthy `id` are rejected with [`Error::InvalidData`]

mod fields;
mod igdb;
mod rawg;
mod schema;

pub use fields::{
    age_rating_label, extract_age_ratings, format_release_date, reference_names, ListStyle,
};
pub use igdb::IgdbNormalizer;
pub use rawg::RawgNormalizer;
pub use schema::{AgeRating, IgdbGame, InvolvedCompany, RawgGame, RawgPlatformEntry, Reference};

use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::types::{DataSource, JsonValue, NormalizedRecord};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Raw catalog record → flat record
pub trait Normalizer: Send + Sync {
    /// Source tag stamped on every record
    fn source(&self) -> DataSource;

    /// Normalize with an explicit fetch timestamp
    fn normalize_at(&self, raw: &JsonValue, fetched_at: DateTime<Utc>)
        -> Result<NormalizedRecord>;

    /// Normalize, stamping the current UTC time
    fn normalize(&self, raw: &JsonValue) -> Result<NormalizedRecord> {
        self.normalize_at(raw, Utc::now())
    }
}

impl From<OutputFormat> for ListStyle {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ListStyle::Joined,
            OutputFormat::Json => ListStyle::Array,
        }
    }
}

/// Decode a raw payload into its typed view
fn decode_raw<T: DeserializeOwned>(raw: &JsonValue) -> Result<T> {
    if !raw.is_object() {
        return Err(Error::invalid_data("expected a JSON object"));
    }
    T::deserialize(raw).map_err(|e| Error::invalid_data(format!("malformed record: {e}")))
}
