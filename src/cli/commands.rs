//! CLI arguments

use crate::types::DataSource;
use clap::{Parser, ValueEnum};

/// Fetch video game metadata from RAWG and IGDB into CSV or JSON files
#[derive(Parser, Debug)]
#[command(name = "gamefetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog to fetch from
    #[arg(value_enum, default_value_t = SourceSelection::Both)]
    pub source: SourceSelection,
}

/// Which catalogs a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelection {
    /// RAWG only
    Rawg,
    /// IGDB only
    Igdb,
    /// RAWG, then IGDB
    Both,
}

impl SourceSelection {
    /// Sources in run order
    pub fn sources(self) -> Vec<DataSource> {
        match self {
            SourceSelection::Rawg => vec![DataSource::Rawg],
            SourceSelection::Igdb => vec![DataSource::Igdb],
            SourceSelection::Both => vec![DataSource::Rawg, DataSource::Igdb],
        }
    }
}
