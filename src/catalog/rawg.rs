//! RAWG REST catalog client

use super::{CatalogSource, ClientSettings, PageRequest, PaginationMode};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::normalize::Reference;
use crate::types::{DataSource, JsonValue};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

/// Public RAWG API root
pub const RAWG_BASE_URL: &str = "https://api.rawg.io/api";

/// Largest `page_size` RAWG accepts
pub const RAWG_MAX_PAGE_SIZE: usize = 40;

/// Parameters for `GET games`
#[derive(Debug, Clone, PartialEq)]
pub struct GamesQuery {
    /// 1-based page number
    pub page: usize,
    /// Items per page, clamped to [`RAWG_MAX_PAGE_SIZE`] when sent
    pub page_size: usize,
    /// Sort order, e.g. `-rating`, `name`, `-released`
    pub ordering: String,
    /// Free-text search
    pub search: Option<String>,
    /// Comma-separated genre ids or slugs
    pub genres: Option<String>,
    /// Comma-separated platform ids
    pub platforms: Option<String>,
}

impl Default for GamesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: RAWG_MAX_PAGE_SIZE,
            ordering: "-rating".to_string(),
            search: None,
            genres: None,
            platforms: None,
        }
    }
}

impl GamesQuery {
    /// First page, highest rated first
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = ordering.into();
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    #[must_use]
    pub fn platforms(mut self, platforms: impl Into<String>) -> Self {
        self.platforms = Some(platforms.into());
        self
    }

    fn to_request(&self) -> RequestConfig {
        RequestConfig::new()
            .query("page", self.page)
            .query("page_size", self.page_size.min(RAWG_MAX_PAGE_SIZE))
            .query("ordering", &self.ordering)
            .query_opt("search", self.search.as_deref())
            .query_opt("genres", self.genres.as_deref())
            .query_opt("platforms", self.platforms.as_deref())
    }
}

/// Envelope of every RAWG list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawgPage {
    /// Total items across all pages
    pub count: Option<i64>,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    /// Raw items of this page
    pub results: Vec<JsonValue>,
}

/// Typed view of a search hit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawgGameSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_top: i64,
    #[serde(default)]
    pub ratings_count: i64,
    #[serde(default)]
    pub metacritic: Option<i64>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub genres: Vec<Reference>,
}

/// Client for the RAWG catalog
#[derive(Debug)]
pub struct RawgClient {
    http: HttpClient,
}

impl RawgClient {
    /// Create a client; a non-empty key is sent as the `key` parameter
    pub fn new(api_key: impl Into<String>, settings: &ClientSettings) -> Result<Self> {
        let api_key = api_key.into();
        let mut config = settings.http_config()?;
        if !api_key.is_empty() {
            config = config.query("key", api_key);
        }

        let http = HttpClient::with_config(config.build())?;
        info!(
            "Initialized RAWG client with rate limit: {:?}",
            settings.rate_limit.min_interval
        );
        Ok(Self { http })
    }

    /// One page of games
    pub async fn get_games(&self, query: &GamesQuery) -> Result<RawgPage> {
        self.http
            .get_json_with_config("games", query.to_request())
            .await
            .inspect_err(|e| error!("Request failed for games: {e}"))
    }

    /// Full detail payload for one game
    pub async fn get_game_details(&self, game_id: i64) -> Result<JsonValue> {
        let endpoint = format!("games/{game_id}");
        self.http
            .get_json_with_config(&endpoint, RequestConfig::new())
            .await
            .inspect_err(|e| error!("Request failed for {endpoint}: {e}"))
    }

    /// All genres
    pub async fn get_genres(&self) -> Result<RawgPage> {
        info!("Fetching genres");
        self.http.get_json("genres").await
    }

    /// All platforms
    pub async fn get_platforms(&self) -> Result<RawgPage> {
        info!("Fetching platforms");
        self.http.get_json("platforms").await
    }

    /// Search by name; hits that fail to decode are logged and skipped
    pub async fn search_games(&self, query: &str, limit: usize) -> Result<Vec<RawgGameSummary>> {
        let page = self
            .get_games(&GamesQuery::new().search(query).page_size(limit))
            .await?;

        let games: Vec<RawgGameSummary> = page
            .results
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(game) => Some(game),
                Err(e) => {
                    error!("Error parsing game data: {e}");
                    None
                }
            })
            .collect();

        info!("Found {} games for query '{}'", games.len(), query);
        Ok(games)
    }

    /// Release the connection pool
    pub fn close(self) {
        self.http.close();
        info!("Closed RAWG client");
    }
}

#[async_trait]
impl CatalogSource for RawgClient {
    fn source(&self) -> DataSource {
        DataSource::Rawg
    }

    fn pagination(&self) -> PaginationMode {
        PaginationMode::PageNumber
    }

    fn page_ceiling(&self) -> usize {
        RAWG_MAX_PAGE_SIZE
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<JsonValue>> {
        let PageRequest::Page { page, page_size } = request else {
            return Err(Error::invalid_argument(
                "RAWG pages by number, not by offset",
            ));
        };

        let query = GamesQuery::new().page(page).page_size(page_size);
        Ok(self.get_games(&query).await?.results)
    }

    async fn fetch_detail(&self, id: i64) -> Result<Option<JsonValue>> {
        self.get_game_details(id).await.map(Some)
    }
}
