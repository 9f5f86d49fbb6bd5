//! Catalog API clients
//!
//! One client per upstream catalog, both built on [`HttpClient`]:
//!
//! - [`RawgClient`] - paginated REST catalog, `key` query parameter auth,
//!   page-number pagination capped at 40 items
//! - [`IgdbClient`] - query-language catalog, `Client-ID` + bearer auth,
//!   POSTed [`IgdbQuery`] bodies, offset pagination capped at 500 items
//!
//! Both implement [`CatalogSource`], the seam the batch fetcher drives.

mod igdb;
mod query;
mod rawg;

pub use igdb::{IgdbClient, IGDB_BASE_URL, IGDB_MAX_LIMIT};
pub use query::{IgdbQuery, SortOrder};
pub use rawg::{
    GamesQuery, RawgClient, RawgGameSummary, RawgPage, RAWG_BASE_URL, RAWG_MAX_PAGE_SIZE,
};

use crate::error::Result;
use crate::http::{HttpClientConfig, HttpClientConfigBuilder, RateLimiterConfig};
use crate::types::{DataSource, JsonValue};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// How a source walks its result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// `page` / `page_size`, pages numbered from 1
    PageNumber,
    /// `offset` / `limit`
    Offset,
}

/// One page worth of request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Page-number request
    Page {
        /// 1-based page number
        page: usize,
        /// Items per page
        page_size: usize,
    },
    /// Offset request
    Offset {
        /// Items to skip
        offset: usize,
        /// Items to return
        limit: usize,
    },
}

impl PageRequest {
    /// Number of items requested
    pub fn size(&self) -> usize {
        match *self {
            PageRequest::Page { page_size, .. } => page_size,
            PageRequest::Offset { limit, .. } => limit,
        }
    }
}

/// A remote catalog that can be paged through and queried by id
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Which catalog this is
    fn source(&self) -> DataSource;

    /// Pagination style of the listing endpoint
    fn pagination(&self) -> PaginationMode;

    /// Largest page the listing endpoint accepts
    fn page_ceiling(&self) -> usize;

    /// Fetch one page of raw items
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<JsonValue>>;

    /// Fetch one item by id; `None` when the catalog has no such item
    async fn fetch_detail(&self, id: i64) -> Result<Option<JsonValue>>;
}

/// Connection settings shared by the catalog clients
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API root, e.g. `https://api.rawg.io/api`
    pub base_url: String,
    /// Minimum spacing between requests
    pub rate_limit: RateLimiterConfig,
    /// Connect/read timeout
    pub timeout: Duration,
}

impl ClientSettings {
    /// Settings for `base_url` with a 1 s rate limit and 30 s timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            rate_limit: RateLimiterConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the rate limit
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimiterConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Set the transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the base URL and start an HTTP config from these settings
    fn http_config(&self) -> Result<HttpClientConfigBuilder> {
        Url::parse(&self.base_url)?;
        Ok(HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(self.timeout)
            .rate_limit(self.rate_limit))
    }
}
