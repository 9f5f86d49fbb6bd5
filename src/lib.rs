// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # gamefetch
//!
//! Fetches video game metadata from the RAWG and IGDB catalogs, flattens it
//! into one record shape per catalog, and writes CSV or JSON files.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gamefetch::catalog::{ClientSettings, RawgClient, RAWG_BASE_URL};
//! use gamefetch::fetch::BatchFetcher;
//! use gamefetch::normalize::RawgNormalizer;
//! use gamefetch::output::{save_records, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> gamefetch::Result<()> {
//!     let client = RawgClient::new("api-key", &ClientSettings::new(RAWG_BASE_URL))?;
//!     let outcome = BatchFetcher::new(&client, RawgNormalizer::default())
//!         .fetch_batch(100)
//!         .await?;
//!     save_records(&outcome.records, "data/raw", "rawg_games", OutputFormat::Json, None)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   catalog    │──▶│    fetch     │──▶│  normalize   │──▶│    output    │
//! │ RAWG / IGDB  │   │ BatchFetcher │   │ flat records │   │  CSV / JSON  │
//! └──────┬───────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!        │
//! ┌──────┴───────┐   ┌──────────────┐
//! │     http     │   │     auth     │
//! │ rate limited │   │ Twitch token │
//! └──────────────┘   └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Environment configuration
pub mod config;

/// Tracing subscriber setup
pub mod logging;

/// HTTP client with rate limiting
pub mod http;

/// IGDB app access tokens
pub mod auth;

/// RAWG and IGDB catalog clients
pub mod catalog;

/// Raw payload to flat record conversion
pub mod normalize;

/// Paginated batch fetching
pub mod fetch;

/// CSV and JSON output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::Config;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
