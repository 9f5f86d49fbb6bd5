//! IGDB query-language catalog client

use super::query::{IgdbQuery, SortOrder};
use super::{CatalogSource, ClientSettings, PageRequest, PaginationMode};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{DataSource, JsonValue};
use async_trait::async_trait;
use tracing::{debug, error, info};

/// Public IGDB API root
pub const IGDB_BASE_URL: &str = "https://api.igdb.com/v4";

/// Largest `limit` IGDB accepts
pub const IGDB_MAX_LIMIT: usize = 500;

/// Minimum vote count for the top-games listing
const MIN_RATING_COUNT: u32 = 10;

/// Expanded fields for listing and detail queries
const GAME_FIELDS: &[&str] = &[
    "name",
    "slug",
    "summary",
    "storyline",
    "first_release_date",
    "rating",
    "rating_count",
    "total_rating",
    "total_rating_count",
    "url",
    "cover.url",
    "genres.name",
    "genres.slug",
    "platforms.name",
    "platforms.slug",
    "themes.name",
    "themes.slug",
    "game_modes.name",
    "game_modes.slug",
    "age_ratings.rating",
    "age_ratings.category",
    "franchises.name",
    "franchises.slug",
    "collection.name",
    "collection.slug",
    "similar_games.name",
    "similar_games.slug",
    "keywords.name",
    "keywords.slug",
    "player_perspectives.name",
    "player_perspectives.slug",
    "game_engines.name",
    "game_engines.slug",
    "involved_companies.company.name",
    "involved_companies.developer",
    "involved_companies.publisher",
];

/// Compact fields for search hits
const SEARCH_FIELDS: &[&str] = &[
    "name",
    "slug",
    "summary",
    "first_release_date",
    "rating",
    "rating_count",
    "genres.name",
    "platforms.name",
];

/// Client for the IGDB catalog
#[derive(Debug)]
pub struct IgdbClient {
    http: HttpClient,
    min_rating: f64,
}

impl IgdbClient {
    /// Create a client; both credentials must be non-empty
    pub fn new(client_id: &str, access_token: &str, settings: &ClientSettings) -> Result<Self> {
        if client_id.trim().is_empty() || access_token.trim().is_empty() {
            return Err(Error::auth("Client ID and access token must be provided"));
        }

        let config = settings
            .http_config()?
            .header("Client-ID", client_id)
            .header("Authorization", format!("Bearer {access_token}"))
            .header("Accept", "application/json")
            .build();

        let http = HttpClient::with_config(config)?;
        info!(
            "Initialized IGDB client with rate limit: {:?}",
            settings.rate_limit.min_interval
        );
        Ok(Self {
            http,
            min_rating: 70.0,
        })
    }

    /// Rating floor used when paging through top games
    #[must_use]
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Configured rating floor
    pub fn min_rating(&self) -> f64 {
        self.min_rating
    }

    /// POST a query to an endpoint
    pub async fn query(&self, endpoint: &str, query: &IgdbQuery) -> Result<Vec<JsonValue>> {
        let body = query.to_string();
        debug!("IGDB {endpoint} query: {body}");

        self.http
            .post_json_with_config(endpoint, RequestConfig::new().text(body.clone()))
            .await
            .inspect_err(|e| {
                error!("IGDB request failed for {endpoint}: {e}");
                error!("Query was: {body}");
            })
    }

    /// Top-rated games with the full field set; `limit` is clamped to 500
    pub async fn get_top_games(
        &self,
        limit: usize,
        offset: usize,
        min_rating: f64,
    ) -> Result<Vec<JsonValue>> {
        let query = IgdbQuery::new()
            .fields(GAME_FIELDS.iter().copied())
            .filter(format!("rating >= {min_rating}"))
            .filter(format!("rating_count >= {MIN_RATING_COUNT}"))
            .sort("rating", SortOrder::Desc)
            .limit(limit.min(IGDB_MAX_LIMIT))
            .offset(offset);

        self.query("games", &query).await
    }

    /// One game by id
    pub async fn get_game_by_id(&self, game_id: i64) -> Result<Option<JsonValue>> {
        let query = IgdbQuery::new()
            .fields(GAME_FIELDS.iter().copied())
            .filter(format!("id = {game_id}"));

        Ok(self.query("games", &query).await?.into_iter().next())
    }

    /// Search by name
    pub async fn search_games(&self, term: &str, limit: usize) -> Result<Vec<JsonValue>> {
        let query = IgdbQuery::new()
            .search(term)
            .fields(SEARCH_FIELDS.iter().copied())
            .limit(limit);

        self.query("games", &query).await
    }

    /// Release the connection pool
    pub fn close(self) {
        self.http.close();
        debug!("IGDB client closed");
    }
}

#[async_trait]
impl CatalogSource for IgdbClient {
    fn source(&self) -> DataSource {
        DataSource::Igdb
    }

    fn pagination(&self) -> PaginationMode {
        PaginationMode::Offset
    }

    fn page_ceiling(&self) -> usize {
        IGDB_MAX_LIMIT
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<JsonValue>> {
        let PageRequest::Offset { offset, limit } = request else {
            return Err(Error::invalid_argument("IGDB pages by offset, not by number"));
        };

        self.get_top_games(limit, offset, self.min_rating).await
    }

    async fn fetch_detail(&self, id: i64) -> Result<Option<JsonValue>> {
        self.get_game_by_id(id).await
    }
}
