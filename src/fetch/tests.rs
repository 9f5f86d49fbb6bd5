//! Tests for the batch fetcher

use super::*;
use crate::normalize::{IgdbNormalizer, ListStyle, RawgNormalizer};
use crate::types::DataSource;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Mutex;
use test_case::test_case;

/// In-memory catalog serving ids `1..=total`
struct FakeSource {
    mode: PaginationMode,
    ceiling: usize,
    total: usize,
    /// 1-based page call that fails
    fail_on_call: Option<usize>,
    /// Items served without an id
    bad_ids: Vec<usize>,
    /// Detail lookups that return nothing
    missing_details: Vec<i64>,
    /// Detail lookups that fail
    failing_details: Vec<i64>,
    calls: Mutex<Vec<PageRequest>>,
    detail_calls: Mutex<Vec<i64>>,
}

impl FakeSource {
    fn new(mode: PaginationMode, ceiling: usize, total: usize) -> Self {
        Self {
            mode,
            ceiling,
            total,
            fail_on_call: None,
            bad_ids: Vec::new(),
            missing_details: Vec::new(),
            failing_details: Vec::new(),
            calls: Mutex::new(Vec::new()),
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    fn paged(total: usize) -> Self {
        Self::new(PaginationMode::PageNumber, 40, total)
    }

    fn offset(total: usize) -> Self {
        Self::new(PaginationMode::Offset, 500, total)
    }

    fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn detail_calls(&self) -> Vec<i64> {
        self.detail_calls.lock().unwrap().clone()
    }

    fn item(&self, n: usize) -> JsonValue {
        if self.bad_ids.contains(&n) {
            json!({"name": format!("Game {n}")})
        } else {
            json!({"id": n, "name": format!("Game {n}")})
        }
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    fn source(&self) -> DataSource {
        DataSource::Rawg
    }

    fn pagination(&self) -> PaginationMode {
        self.mode
    }

    fn page_ceiling(&self) -> usize {
        self.ceiling
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<JsonValue>> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request);
            calls.len()
        };
        if self.fail_on_call == Some(call) {
            return Err(Error::http_status(503, "unavailable"));
        }

        let start = match request {
            PageRequest::Page { page, page_size } => (page - 1) * page_size,
            PageRequest::Offset { offset, .. } => offset,
        };
        let end = (start + request.size()).min(self.total);
        Ok((start..end).map(|i| self.item(i + 1)).collect())
    }

    async fn fetch_detail(&self, id: i64) -> Result<Option<JsonValue>> {
        self.detail_calls.lock().unwrap().push(id);
        if self.failing_details.contains(&id) {
            return Err(Error::http_status(500, "boom"));
        }
        if self.missing_details.contains(&id) {
            return Ok(None);
        }
        Ok(Some(json!({
            "id": id,
            "name": format!("Detail {id}"),
            "genres": [{"id": 4, "name": "Action"}]
        })))
    }
}

fn ids(outcome: &FetchOutcome) -> Vec<i64> {
    outcome
        .records
        .iter()
        .filter_map(|r| r.get("rawg_id").and_then(JsonValue::as_i64))
        .collect()
}

// ============================================================================
// Argument validation
// ============================================================================

#[test_case(0 ; "zero")]
#[test_case(-1 ; "negative")]
#[test_case(i64::MIN ; "minimum")]
#[tokio::test]
async fn test_non_positive_limit_makes_no_calls(limit: i64) {
    let source = FakeSource::paged(100);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let err = fetcher.fetch_batch(limit).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }), "got {err:?}");
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_fetch_details_rejects_empty_ids() {
    let source = FakeSource::paged(10);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let err = fetcher.fetch_details(&[]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(source.detail_calls().is_empty());
}

// ============================================================================
// Page-number loop
// ============================================================================

#[tokio::test]
async fn test_single_page_when_limit_below_ceiling() {
    let source = FakeSource::paged(100);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(25).await.unwrap();

    assert_eq!(outcome.len(), 25);
    assert_eq!(outcome.stats.stop_reason, StopReason::LimitReached);
    assert_eq!(source.calls(), vec![PageRequest::Page { page: 1, page_size: 25 }]);
}

#[tokio::test]
async fn test_fixed_page_size_and_trimmed_last_page() {
    let source = FakeSource::paged(1000);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(100).await.unwrap();

    assert_eq!(
        source.calls(),
        vec![
            PageRequest::Page { page: 1, page_size: 40 },
            PageRequest::Page { page: 2, page_size: 40 },
            PageRequest::Page { page: 3, page_size: 40 },
        ]
    );
    assert_eq!(ids(&outcome), (1..=100).collect::<Vec<i64>>());
    assert_eq!(outcome.stats.items_received, 120);
    assert_eq!(outcome.stats.stop_reason, StopReason::LimitReached);
}

#[tokio::test]
async fn test_page_number_stops_on_empty_page() {
    let source = FakeSource::paged(50);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(100).await.unwrap();

    assert_eq!(outcome.len(), 50);
    assert_eq!(outcome.stats.pages_requested, 3);
    assert_eq!(outcome.stats.stop_reason, StopReason::EmptyPage);
}

#[test_case(1 ; "one")]
#[test_case(39 ; "below ceiling")]
#[test_case(40 ; "at ceiling")]
#[test_case(41 ; "above ceiling")]
#[test_case(81 ; "three pages")]
#[test_case(150 ; "exactly upstream")]
#[test_case(400 ; "beyond upstream")]
#[tokio::test]
async fn test_never_exceeds_limit(limit: i64) {
    let source = FakeSource::paged(150);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(limit).await.unwrap();

    let expected = usize::try_from(limit).unwrap().min(150);
    assert_eq!(outcome.len(), expected);
    assert_eq!(ids(&outcome), (1..=expected as i64).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_transport_failure_keeps_earlier_pages() {
    let mut source = FakeSource::paged(1000);
    source.fail_on_call = Some(2);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(100).await.unwrap();

    assert_eq!(ids(&outcome), (1..=40).collect::<Vec<i64>>());
    assert_eq!(outcome.stats.pages_requested, 2);
    assert_eq!(outcome.stats.stop_reason, StopReason::TransportFailure);
}

#[tokio::test]
async fn test_transport_failure_on_first_page_is_empty_batch() {
    let mut source = FakeSource::paged(1000);
    source.fail_on_call = Some(1);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(10).await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.stats.stop_reason, StopReason::TransportFailure);
}

#[tokio::test]
async fn test_invalid_items_are_skipped() {
    let mut source = FakeSource::paged(100);
    source.bad_ids = vec![2, 5];
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::new(ListStyle::Joined));

    let outcome = fetcher.fetch_batch(10).await.unwrap();

    assert_eq!(ids(&outcome), vec![1, 3, 4, 6, 7, 8, 9, 10, 11, 12]);
    assert_eq!(outcome.stats.items_skipped, 2);
    assert_eq!(outcome.stats.pages_requested, 2);
    assert!(outcome
        .records
        .iter()
        .all(|r| r.data_source() == Some("rawg")));
}

// ============================================================================
// Offset loop
// ============================================================================

#[tokio::test]
async fn test_offset_requests_remaining_and_advances() {
    let source = FakeSource::offset(1200);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(1100).await.unwrap();

    assert_eq!(
        source.calls(),
        vec![
            PageRequest::Offset { offset: 0, limit: 500 },
            PageRequest::Offset { offset: 500, limit: 500 },
            PageRequest::Offset { offset: 1000, limit: 100 },
        ]
    );
    assert_eq!(outcome.len(), 1100);
    assert_eq!(outcome.stats.stop_reason, StopReason::LimitReached);
}

#[tokio::test]
async fn test_offset_stops_on_short_page() {
    let source = FakeSource::offset(30);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(100).await.unwrap();

    assert_eq!(outcome.len(), 30);
    assert_eq!(source.calls().len(), 1);
    assert_eq!(outcome.stats.stop_reason, StopReason::ShortPage);
}

#[tokio::test]
async fn test_offset_limit_at_upstream_end() {
    let source = FakeSource::offset(100);
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(100).await.unwrap();

    assert_eq!(outcome.len(), 100);
    assert_eq!(outcome.stats.stop_reason, StopReason::LimitReached);
}

#[tokio::test]
async fn test_offset_skipped_items_request_the_shortfall() {
    let mut source = FakeSource::offset(1000);
    source.bad_ids = vec![1, 2, 3];
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_batch(10).await.unwrap();

    assert_eq!(
        source.calls(),
        vec![
            PageRequest::Offset { offset: 0, limit: 10 },
            PageRequest::Offset { offset: 10, limit: 3 },
        ]
    );
    assert_eq!(ids(&outcome), (4..=13).collect::<Vec<i64>>());
    assert_eq!(outcome.stats.items_skipped, 3);
}

#[tokio::test]
async fn test_igdb_normalizer_through_fetcher() {
    let source = FakeSource::offset(5);
    let fetcher = BatchFetcher::new(&source, IgdbNormalizer::default());

    let outcome = fetcher.fetch_batch(5).await.unwrap();

    assert_eq!(outcome.len(), 5);
    assert_eq!(outcome.records[0].get("igdb_id"), Some(&json!(1)));
}

// ============================================================================
// Detail variants
// ============================================================================

#[tokio::test]
async fn test_listing_with_details() {
    let mut source = FakeSource::paged(3);
    source.missing_details = vec![2];
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::new(ListStyle::Array))
        .with_details(true);

    let outcome = fetcher.fetch_batch(5).await.unwrap();

    assert_eq!(source.detail_calls(), vec![1, 2, 3]);
    assert_eq!(ids(&outcome), vec![1, 3]);
    assert_eq!(outcome.records[1].get("name"), Some(&json!("Detail 3")));
    assert_eq!(outcome.records[1].get("genres"), Some(&json!(["Action"])));
    assert_eq!(outcome.stats.detail_requests, 3);
    assert_eq!(outcome.stats.items_skipped, 1);
    assert_eq!(outcome.stats.stop_reason, StopReason::EmptyPage);
}

#[tokio::test]
async fn test_listing_with_details_skips_items_without_id() {
    let mut source = FakeSource::paged(3);
    source.bad_ids = vec![1];
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default()).with_details(true);

    let outcome = fetcher.fetch_batch(3).await.unwrap();

    assert_eq!(source.detail_calls(), vec![2, 3]);
    assert_eq!(ids(&outcome), vec![2, 3]);
}

#[tokio::test]
async fn test_fetch_details_by_ids() {
    let mut source = FakeSource::paged(0);
    source.missing_details = vec![404];
    source.failing_details = vec![7];
    let fetcher = BatchFetcher::new(&source, RawgNormalizer::default());

    let outcome = fetcher.fetch_details(&[5, 404, 7, 9]).await.unwrap();

    assert_eq!(source.detail_calls(), vec![5, 404, 7, 9]);
    assert!(source.calls().is_empty());
    assert_eq!(ids(&outcome), vec![5, 9]);
    assert_eq!(outcome.stats.items_skipped, 2);
    assert_eq!(outcome.stats.stop_reason, StopReason::Completed);
}

#[test]
fn test_stop_reason_display() {
    assert_eq!(StopReason::LimitReached.to_string(), "limit reached");
    assert_eq!(StopReason::ShortPage.to_string(), "short page");
}
