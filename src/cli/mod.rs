//! CLI module
//!
//! `gamefetch [rawg|igdb|both]` fetches the selected catalogs, writes one file
//! per catalog into `DATA_DIR`, and prints a ✓/✗ line per catalog.

mod commands;
mod runner;

pub use commands::{Cli, SourceSelection};
pub use runner::{Runner, SourceReport};
