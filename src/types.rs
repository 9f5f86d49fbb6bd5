//! Common types used throughout gamefetch
//!
//! This module contains shared type definitions, type aliases,
//! and the normalized record that flows from the fetchers to the writers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type (insertion ordered)
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Ordered records produced by one fetch invocation
pub type FetchBatch = Vec<NormalizedRecord>;

// ============================================================================
// Data Source
// ============================================================================

/// Upstream catalog a record was fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// RAWG paginated REST catalog
    Rawg,
    /// IGDB query-language catalog
    Igdb,
}

impl DataSource {
    /// Literal tag written into every record
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Rawg => "rawg",
            DataSource::Igdb => "igdb",
        }
    }

    /// Key holding the upstream identifier
    pub fn id_field(self) -> &'static str {
        match self {
            DataSource::Rawg => "rawg_id",
            DataSource::Igdb => "igdb_id",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rawg" => Ok(DataSource::Rawg),
            "igdb" => Ok(DataSource::Igdb),
            other => Err(crate::Error::invalid_argument(format!(
                "Unknown data source: {other}"
            ))),
        }
    }
}

// ============================================================================
// Normalized Record
// ============================================================================

/// A flat game record ready for tabular or JSON storage.
///
/// Always carries the source identifier, `fetched_at` and `data_source`.
/// Field order is the order the normalizer inserted them, which is also the
/// CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord(JsonObject);

impl NormalizedRecord {
    /// Wrap already flattened fields. The caller guarantees the invariants.
    pub(crate) fn from_fields(fields: JsonObject) -> Self {
        Self(fields)
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields (never true for normalizer output)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &JsonObject {
        &self.0
    }

    /// Consume into the underlying map
    pub fn into_map(self) -> JsonObject {
        self.0
    }

    /// The `data_source` tag
    pub fn data_source(&self) -> Option<&str> {
        self.0.get("data_source").and_then(JsonValue::as_str)
    }
}

impl From<NormalizedRecord> for JsonValue {
    fn from(record: NormalizedRecord) -> Self {
        JsonValue::Object(record.0)
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}
