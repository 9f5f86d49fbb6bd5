//! HTTP client module
//!
//! Provides the HTTP client shared by the catalog clients.
//!
//! # Features
//!
//! - **Rate Limiting**: Fixed minimum interval between requests using governor
//! - **Default Credentials**: Headers and query parameters applied to every request
//! - **No Retries**: Failed requests are surfaced to the caller as-is

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig, MAX_INTERVAL};
