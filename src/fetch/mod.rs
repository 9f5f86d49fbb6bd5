//! Batch fetch module
//!
//! Drives a [`CatalogSource`] page by page and normalizes every item until a
//! record limit is reached or the upstream runs dry.
//!
//! # Overview
//!
//! - Page-number sources use one page size for the whole run,
//!   `min(limit, page_ceiling)`, and advance the page by one
//! - Offset sources request `min(remaining, page_ceiling)` items and advance the
//!   offset by the requested size; a short page ends the run
//! - A failed page request ends the run but keeps what was collected
//! - A failed item (normalization or detail fetch) is logged and skipped
//!
//! Only a non-positive limit or an empty id list is an error.

mod types;

pub use types::{FetchOutcome, FetchStats, StopReason};

use crate::catalog::{CatalogSource, PageRequest, PaginationMode};
use crate::error::{Error, Result};
use crate::normalize::Normalizer;
use crate::types::{FetchBatch, JsonValue, NormalizedRecord};
use tracing::{debug, error, info, warn};

/// Accumulates normalized records from one catalog
pub struct BatchFetcher<'a> {
    source: &'a dyn CatalogSource,
    normalizer: Box<dyn Normalizer + 'a>,
    with_details: bool,
}

impl<'a> BatchFetcher<'a> {
    /// Create a fetcher over `source`, normalizing with `normalizer`
    pub fn new(source: &'a dyn CatalogSource, normalizer: impl Normalizer + 'a) -> Self {
        Self {
            source,
            normalizer: Box::new(normalizer),
            with_details: false,
        }
    }

    /// Fetch each listed item's detail payload before normalizing it
    #[must_use]
    pub fn with_details(mut self, enabled: bool) -> Self {
        self.with_details = enabled;
        self
    }

    /// Collect up to `limit` records.
    ///
    /// Fails only when `limit` is not positive, in which case no request is made.
    pub async fn fetch_batch(&self, limit: i64) -> Result<FetchOutcome> {
        let limit = usize::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| {
                Error::invalid_argument(format!("limit must be positive, got {limit}"))
            })?;

        let source = self.source.source();
        let mode = self.source.pagination();
        let ceiling = self.source.page_ceiling().max(1);
        // Page numbers index a fixed page size: min(limit, ceiling), never the
        // remainder, or later pages would overlap earlier ones
        let page_size = limit.min(ceiling);

        info!("Fetching up to {limit} {source} records");

        let mut records = FetchBatch::with_capacity(page_size);
        let mut stats = FetchStats::new();
        let mut cursor = match mode {
            PaginationMode::PageNumber => 1,
            PaginationMode::Offset => 0,
        };

        stats.stop_reason = loop {
            let request = match mode {
                PaginationMode::PageNumber => PageRequest::Page {
                    page: cursor,
                    page_size,
                },
                PaginationMode::Offset => PageRequest::Offset {
                    offset: cursor,
                    limit: (limit - records.len()).min(ceiling),
                },
            };

            info!("Fetching {source} page {}...", stats.pages_requested + 1);
            stats.add_page();

            let items = match self.source.fetch_page(request).await {
                Ok(items) => items,
                Err(e) => {
                    error!("Failed to fetch {source} page {:?}: {e}", request);
                    break StopReason::TransportFailure;
                }
            };

            if items.is_empty() {
                info!("No more {source} results");
                break StopReason::EmptyPage;
            }

            let received = items.len();
            stats.add_received(received);

            for item in items {
                if records.len() >= limit {
                    break;
                }
                if let Some(record) = self.process_item(&item, &mut stats).await {
                    records.push(record);
                }
            }

            debug!("{source}: {} of {limit} records after page", records.len());

            cursor += match mode {
                PaginationMode::PageNumber => 1,
                PaginationMode::Offset => request.size(),
            };

            if records.len() >= limit {
                break StopReason::LimitReached;
            }

            if mode == PaginationMode::Offset && received < request.size() {
                info!("Short {source} page ({received} < {}), stopping", request.size());
                break StopReason::ShortPage;
            }
        };

        info!(
            "Fetched {} {source} records in {} pages ({})",
            records.len(),
            stats.pages_requested,
            stats.stop_reason
        );

        Ok(FetchOutcome { records, stats })
    }

    /// Fetch and normalize specific items by id.
    ///
    /// Fails only when `ids` is empty.
    pub async fn fetch_details(&self, ids: &[i64]) -> Result<FetchOutcome> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("game id list cannot be empty"));
        }

        let source = self.source.source();
        info!("Fetching detailed data for {} {source} games", ids.len());

        let mut records = FetchBatch::with_capacity(ids.len());
        let mut stats = FetchStats::new();

        for &id in ids {
            if let Some(record) = self.fetch_one(id, &mut stats).await {
                records.push(record);
            }
        }

        stats.stop_reason = StopReason::Completed;
        info!("Fetched {} of {} {source} games by id", records.len(), ids.len());

        Ok(FetchOutcome { records, stats })
    }

    /// Normalize one listed item, going through its detail payload when enabled
    async fn process_item(
        &self,
        item: &JsonValue,
        stats: &mut FetchStats,
    ) -> Option<NormalizedRecord> {
        if !self.with_details {
            return self.normalize(item, stats);
        }

        match item.get("id").and_then(JsonValue::as_i64) {
            Some(id) => self.fetch_one(id, stats).await,
            None => {
                warn!("Skipping {} item without id", self.source.source());
                stats.add_skipped();
                None
            }
        }
    }

    async fn fetch_one(&self, id: i64, stats: &mut FetchStats) -> Option<NormalizedRecord> {
        debug!("Fetching details for game {id}");
        stats.add_detail_request();

        match self.source.fetch_detail(id).await {
            Ok(Some(detail)) => self.normalize(&detail, stats),
            Ok(None) => {
                warn!("No {} game with id {id}", self.source.source());
                stats.add_skipped();
                None
            }
            Err(e) => {
                error!("Failed to fetch game {id}: {e}");
                stats.add_skipped();
                None
            }
        }
    }

    fn normalize(&self, raw: &JsonValue, stats: &mut FetchStats) -> Option<NormalizedRecord> {
        match self.normalizer.normalize(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {} item: {e}", self.source.source());
                stats.add_skipped();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
