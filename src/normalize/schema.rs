//! Typed views over raw catalog payloads
//!
//! Every field is optional and decoded leniently. A missing, `null` or
//! mistyped scalar becomes `None`; a missing, `null` or non-array list becomes
//! empty, and list entries that do not decode are dropped. An odd value in one
//! field never rejects the whole record.

use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

/// Decode the value if it has the expected shape, otherwise `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Decode an array element by element, skipping entries that do not fit
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Keep any non-null value as is
fn present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(JsonValue::deserialize(deserializer)?).filter(|v| !v.is_null()))
}

/// A nested `{id, name, url}` object such as a genre, platform or cover
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Reference {
    /// Name, if present and non-empty
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        let text = |key: &str| value.get(key).and_then(JsonValue::as_str).map(str::to_owned);

        Ok(Self {
            id: value.get("id").and_then(JsonValue::as_i64),
            name: text("name"),
            url: text("url"),
        })
    }
}

// ============================================================================
// RAWG
// ============================================================================

/// One entry of the RAWG `platforms` list; the name sits one level deeper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawgPlatformEntry {
    #[serde(default)]
    pub platform: Option<Reference>,
}

/// RAWG game, either a list summary or a detail payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawgGame {
    #[serde(deserialize_with = "present")]
    pub id: Option<JsonValue>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub released: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub rating: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub rating_top: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub ratings_count: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub metacritic: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub background_image: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description_raw: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub updated: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub playtime: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub achievements_count: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub creators_count: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub additions_count: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub game_series_count: Option<Number>,
    #[serde(deserialize_with = "lenient_list")]
    pub genres: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub platforms: Vec<RawgPlatformEntry>,
    #[serde(deserialize_with = "lenient_list")]
    pub developers: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub publishers: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<Reference>,
}

// ============================================================================
// IGDB
// ============================================================================

/// One entry of `involved_companies` with its role flags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InvolvedCompany {
    pub company: Option<Reference>,
    #[serde(deserialize_with = "lenient")]
    pub developer: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub publisher: Option<bool>,
}

/// One entry of `age_ratings`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgeRating {
    #[serde(deserialize_with = "lenient")]
    pub category: Option<i64>,
    pub rating: Option<JsonValue>,
}

/// IGDB game as returned by the `games` endpoint with expanded fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IgdbGame {
    #[serde(deserialize_with = "present")]
    pub id: Option<JsonValue>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub storyline: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    pub cover: Option<Reference>,
    #[serde(deserialize_with = "lenient")]
    pub first_release_date: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub rating: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub rating_count: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub total_rating: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub total_rating_count: Option<Number>,
    #[serde(deserialize_with = "lenient_list")]
    pub genres: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub platforms: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub themes: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub game_modes: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub franchises: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub keywords: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub player_perspectives: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub game_engines: Vec<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub similar_games: Vec<Reference>,
    pub collection: Option<Reference>,
    #[serde(deserialize_with = "lenient_list")]
    pub involved_companies: Vec<InvolvedCompany>,
    #[serde(deserialize_with = "lenient_list")]
    pub age_ratings: Vec<AgeRating>,
}
