//! Field-level helpers shared by the normalization profiles

use super::schema::{AgeRating, Reference};
use crate::types::{DataSource, JsonObject, JsonValue, NormalizedRecord};
use chrono::{DateTime, SecondsFormat, Utc};

/// How list-of-object fields are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    /// Comma-joined string, for CSV output
    Joined,
    /// JSON array of names, for JSON output
    #[default]
    Array,
}

/// Fixed age-rating organisations keyed by IGDB category code
const AGE_RATING_BOARDS: [(i64, &str); 5] = [
    (1, "ESRB"),
    (2, "PEGI"),
    (3, "CERO"),
    (4, "USK"),
    (5, "OFLC"),
];

/// Label for an age-rating category code; unknown codes render as `category_{n}`
pub fn age_rating_label(category: i64) -> String {
    AGE_RATING_BOARDS
        .iter()
        .find(|(code, _)| *code == category)
        .map_or_else(|| format!("category_{category}"), |(_, label)| (*label).to_string())
}

/// Map age ratings to `{board: rating}`; entries without a category or rating are dropped
pub fn extract_age_ratings(ratings: &[AgeRating]) -> JsonObject {
    let mut out = JsonObject::new();
    for entry in ratings {
        if let (Some(category), Some(rating)) = (entry.category, entry.rating.as_ref()) {
            if !rating.is_null() {
                out.insert(age_rating_label(category), rating.clone());
            }
        }
    }
    out
}

/// Convert Unix seconds to an ISO-8601 UTC calendar date.
///
/// `None`, zero, and timestamps outside the representable range yield `None`.
pub fn format_release_date(timestamp: Option<i64>) -> Option<String> {
    let ts = timestamp.filter(|t| *t != 0)?;
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}

/// The identifier if it is truthy: not `false`, zero, or an empty string, list or object
pub(crate) fn truthy_id(id: Option<JsonValue>) -> Option<JsonValue> {
    id.filter(|value| match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => !map.is_empty(),
    })
}

/// Names of the given references, skipping entries without one
pub fn reference_names<'a>(items: impl IntoIterator<Item = &'a Reference>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(Reference::name)
        .map(str::to_owned)
        .collect()
}

/// Accumulates flat fields in insertion order
#[derive(Debug)]
pub(crate) struct RecordBuilder {
    fields: JsonObject,
    style: ListStyle,
}

impl RecordBuilder {
    pub(crate) fn new(style: ListStyle) -> Self {
        Self {
            fields: JsonObject::new(),
            style,
        }
    }

    /// Copy a scalar; `None` is stored as `null`
    pub(crate) fn scalar(&mut self, key: &str, value: impl Into<JsonValue>) -> &mut Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Store a list of names according to the list style
    pub(crate) fn names(&mut self, key: &str, names: Vec<String>) -> &mut Self {
        let value = match self.style {
            ListStyle::Joined => JsonValue::String(names.join(",")),
            ListStyle::Array => {
                JsonValue::Array(names.into_iter().map(JsonValue::String).collect())
            }
        };
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Store a list of numeric ids according to the list style
    pub(crate) fn ids(&mut self, key: &str, ids: Vec<i64>) -> &mut Self {
        let value = match self.style {
            ListStyle::Joined => JsonValue::String(
                ids.iter().map(i64::to_string).collect::<Vec<_>>().join(","),
            ),
            ListStyle::Array => JsonValue::Array(ids.into_iter().map(JsonValue::from).collect()),
        };
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Store a mapping; joined style flattens it to `key:value` pairs
    pub(crate) fn mapping(&mut self, key: &str, map: JsonObject) -> &mut Self {
        let value = match self.style {
            ListStyle::Joined => JsonValue::String(
                map.iter()
                    .map(|(k, v)| match v {
                        JsonValue::String(s) => format!("{k}:{s}"),
                        other => format!("{k}:{other}"),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            ListStyle::Array => JsonValue::Object(map),
        };
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Stamp the fetch time and source tag and seal the record
    pub(crate) fn finish(
        mut self,
        source: DataSource,
        fetched_at: DateTime<Utc>,
    ) -> NormalizedRecord {
        self.fields.insert(
            "fetched_at".to_string(),
            JsonValue::String(fetched_at.to_rfc3339_opts(SecondsFormat::Micros, false)),
        );
        self.fields.insert(
            "data_source".to_string(),
            JsonValue::String(source.as_str().to_string()),
        );
        NormalizedRecord::from_fields(self.fields)
    }
}
