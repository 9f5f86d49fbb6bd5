//! IGDB normalization profile

use super::fields::{
    extract_age_ratings, format_release_date, reference_names, truthy_id, ListStyle,
    RecordBuilder,
};
use super::schema::{IgdbGame, InvolvedCompany, Reference};
use super::{decode_raw, Normalizer};
use crate::error::{Error, Result};
use crate::types::{DataSource, JsonValue, NormalizedRecord};
use chrono::{DateTime, Utc};

/// Flattens IGDB game payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct IgdbNormalizer {
    style: ListStyle,
}

impl IgdbNormalizer {
    /// Create a normalizer with the given list style
    pub fn new(style: ListStyle) -> Self {
        Self { style }
    }

    /// List style in use
    pub fn style(&self) -> ListStyle {
        self.style
    }
}

/// Company names whose role flag is set
fn company_names(
    companies: &[InvolvedCompany],
    role: impl Fn(&InvolvedCompany) -> Option<bool>,
) -> Vec<String> {
    companies
        .iter()
        .filter(|c| role(c).unwrap_or(false))
        .filter_map(|c| c.company.as_ref()?.name())
        .map(str::to_owned)
        .collect()
}

/// IGDB serves protocol-relative image URLs
fn absolute_url(reference: Option<&Reference>) -> Option<String> {
    let url = reference?.url.as_deref().filter(|u| !u.is_empty())?;
    if url.starts_with("//") {
        Some(format!("https:{url}"))
    } else {
        Some(url.to_string())
    }
}

impl Normalizer for IgdbNormalizer {
    fn source(&self) -> DataSource {
        DataSource::Igdb
    }

    fn normalize_at(
        &self,
        raw: &JsonValue,
        fetched_at: DateTime<Utc>,
    ) -> Result<NormalizedRecord> {
        let game: IgdbGame = decode_raw(raw)?;
        let id = truthy_id(game.id)
            .ok_or_else(|| Error::invalid_data("missing required field 'id'"))?;

        let mut record = RecordBuilder::new(self.style);
        record
            .scalar("igdb_id", id)
            .scalar("name", game.name)
            .scalar("slug", game.slug)
            .scalar("summary", game.summary)
            .scalar("storyline", game.storyline)
            .scalar("url", game.url)
            .scalar("cover_url", absolute_url(game.cover.as_ref()))
            .scalar("first_release_date", format_release_date(game.first_release_date))
            .scalar("rating", game.rating)
            .scalar("rating_count", game.rating_count)
            .scalar("total_rating", game.total_rating)
            .scalar("total_rating_count", game.total_rating_count)
            .names("genres", reference_names(&game.genres))
            .names("platforms", reference_names(&game.platforms))
            .names("themes", reference_names(&game.themes))
            .names("game_modes", reference_names(&game.game_modes))
            .names("franchises", reference_names(&game.franchises))
            .names("keywords", reference_names(&game.keywords))
            .names("player_perspectives", reference_names(&game.player_perspectives))
            .names("game_engines", reference_names(&game.game_engines))
            .names("similar_games", reference_names(&game.similar_games))
            .names("developers", company_names(&game.involved_companies, |c| c.developer))
            .names("publishers", company_names(&game.involved_companies, |c| c.publisher))
            .mapping("age_ratings", extract_age_ratings(&game.age_ratings))
            .names("collection", reference_names(game.collection.as_ref()));

        Ok(record.finish(DataSource::Igdb, fetched_at))
    }
}
