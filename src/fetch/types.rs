//! Fetch result and statistics types

use crate::types::FetchBatch;
use std::fmt;

/// Why a fetch loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of records was collected
    LimitReached,
    /// A page request failed; records gathered so far are kept
    TransportFailure,
    /// The upstream returned a page with no items
    EmptyPage,
    /// An offset page came back smaller than requested
    ShortPage,
    /// Every id of a detail-by-id run was attempted
    Completed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::LimitReached => "limit reached",
            StopReason::TransportFailure => "transport failure",
            StopReason::EmptyPage => "empty page",
            StopReason::ShortPage => "short page",
            StopReason::Completed => "completed",
        };
        f.write_str(text)
    }
}

/// Counters from one fetch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStats {
    /// Listing pages requested, including a failed one
    pub pages_requested: usize,
    /// Per-item detail requests issued
    pub detail_requests: usize,
    /// Raw items received across all pages
    pub items_received: usize,
    /// Items dropped because normalization or their detail fetch failed
    pub items_skipped: usize,
    /// How the loop ended
    pub stop_reason: StopReason,
}

impl Default for FetchStats {
    fn default() -> Self {
        Self {
            pages_requested: 0,
            detail_requests: 0,
            items_received: 0,
            items_skipped: 0,
            stop_reason: StopReason::Completed,
        }
    }
}

impl FetchStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page request
    pub fn add_page(&mut self) {
        self.pages_requested += 1;
    }

    /// Add a detail request
    pub fn add_detail_request(&mut self) {
        self.detail_requests += 1;
    }

    /// Add received items
    pub fn add_received(&mut self, count: usize) {
        self.items_received += count;
    }

    /// Add a skipped item
    pub fn add_skipped(&mut self) {
        self.items_skipped += 1;
    }
}

/// Records collected by a fetch run, with its statistics
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Normalized records in upstream order
    pub records: FetchBatch,
    /// Counters and stop reason
    pub stats: FetchStats,
}

impl FetchOutcome {
    /// Number of records collected
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
