//! RAWG normalization profile
//!
//! The upstream `id` is written as `rawg_id`, matching `igdb_id` on the IGDB
//! side. The per-user `user_game` field is not emitted.

use super::fields::{reference_names, truthy_id, ListStyle, RecordBuilder};
use super::schema::RawgGame;
use super::{decode_raw, Normalizer};
use crate::error::{Error, Result};
use crate::types::{DataSource, JsonValue, NormalizedRecord};
use chrono::{DateTime, Utc};

/// Flattens RAWG list summaries and detail payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct RawgNormalizer {
    style: ListStyle,
}

impl RawgNormalizer {
    /// Create a normalizer with the given list style
    pub fn new(style: ListStyle) -> Self {
        Self { style }
    }

    /// List style in use
    pub fn style(&self) -> ListStyle {
        self.style
    }
}

impl Normalizer for RawgNormalizer {
    fn source(&self) -> DataSource {
        DataSource::Rawg
    }

    fn normalize_at(
        &self,
        raw: &JsonValue,
        fetched_at: DateTime<Utc>,
    ) -> Result<NormalizedRecord> {
        let game: RawgGame = decode_raw(raw)?;
        let id = truthy_id(game.id)
            .ok_or_else(|| Error::invalid_data("missing required field 'id'"))?;

        let platforms = game
            .platforms
            .iter()
            .filter_map(|entry| entry.platform.as_ref()?.name())
            .map(str::to_owned)
            .collect();

        let mut record = RecordBuilder::new(self.style);
        record
            .scalar("rawg_id", id)
            .scalar("name", game.name)
            .scalar("slug", game.slug)
            .scalar("released", game.released)
            .scalar("rating", game.rating)
            .scalar("rating_top", game.rating_top)
            .scalar("ratings_count", game.ratings_count)
            .scalar("metacritic", game.metacritic)
            .scalar("background_image", game.background_image)
            .scalar("website", game.website)
            .scalar("description_raw", game.description_raw)
            .scalar("updated", game.updated)
            .scalar("playtime", game.playtime)
            .scalar("achievements_count", game.achievements_count)
            .scalar("creators_count", game.creators_count)
            .scalar("additions_count", game.additions_count)
            .scalar("game_series_count", game.game_series_count)
            .names("genres", reference_names(&game.genres))
            .ids("genre_ids", game.genres.iter().filter_map(|g| g.id).collect())
            .names("platforms", platforms)
            .names("developers", reference_names(&game.developers))
            .names("publishers", reference_names(&game.publishers))
            .names("tags", reference_names(&game.tags));

        Ok(record.finish(DataSource::Rawg, fetched_at))
    }
}
