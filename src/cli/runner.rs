//! CLI runner - executes the fetch pipeline

use crate::auth::request_app_token;
use crate::catalog::{IgdbClient, RawgClient};
use crate::cli::commands::Cli;
use crate::config::{Config, IgdbAuth};
use crate::error::{Error, Result};
use crate::fetch::{BatchFetcher, FetchOutcome, FetchStats};
use crate::http::{HttpClient, HttpClientConfig};
use crate::normalize::{IgdbNormalizer, RawgNormalizer};
use crate::output::save_records;
use crate::types::DataSource;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// What one source produced
#[derive(Debug, Clone)]
pub struct SourceReport {
    /// Catalog fetched
    pub source: DataSource,
    /// File written
    pub path: PathBuf,
    /// Records written
    pub records: usize,
    /// Fetch statistics
    pub stats: FetchStats,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
    config: Config,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli, config: Config) -> Self {
        Self { cli, config }
    }

    /// Run every selected source.
    ///
    /// Credentials for all selected sources are checked before any request.
    /// A failing source does not stop the others, but makes the run fail.
    pub async fn run(&self) -> Result<Vec<SourceReport>> {
        let sources = self.cli.source.sources();
        for source in &sources {
            self.check_credentials(*source)?;
        }

        let start = Instant::now();
        let mut reports = Vec::new();
        let mut failed = Vec::new();

        for source in sources {
            println!("Fetching {source} games...");
            match self.run_source(source).await {
                Ok(report) => {
                    println!(
                        "✓ {source}: saved {} records to {}",
                        report.records,
                        report.path.display()
                    );
                    reports.push(report);
                }
                Err(e) => {
                    error!("{source} pipeline failed: {e}");
                    println!("✗ {source}: {e}");
                    failed.push(source.as_str());
                }
            }
        }

        info!(
            "Pipeline finished in {:.1}s: {} succeeded, {} failed",
            start.elapsed().as_secs_f64(),
            reports.len(),
            failed.len()
        );

        if failed.is_empty() {
            Ok(reports)
        } else {
            Err(Error::Other(format!(
                "Pipeline failed for: {}",
                failed.join(", ")
            )))
        }
    }

    fn check_credentials(&self, source: DataSource) -> Result<()> {
        match source {
            DataSource::Rawg => self.config.rawg_credentials().map(|_| ()),
            DataSource::Igdb => self.config.igdb_credentials().map(|_| ()),
        }
    }

    async fn run_source(&self, source: DataSource) -> Result<SourceReport> {
        let outcome = match source {
            DataSource::Rawg => self.fetch_rawg().await?,
            DataSource::Igdb => self.fetch_igdb().await?,
        };

        let records = outcome.len();
        let path = save_records(
            &outcome.records,
            &self.config.data_dir,
            &format!("{source}_games"),
            self.config.output_format,
            None,
        )?;

        Ok(SourceReport {
            source,
            path,
            records,
            stats: outcome.stats,
        })
    }

    async fn fetch_rawg(&self) -> Result<FetchOutcome> {
        let client = RawgClient::new(
            self.config.rawg_credentials()?,
            &self.config.rawg_settings(),
        )?;
        let normalizer = RawgNormalizer::new(self.config.output_format.into());

        let outcome = BatchFetcher::new(&client, normalizer)
            .with_details(self.config.rawg_fetch_details)
            .fetch_batch(self.config.fetch_limit)
            .await;

        client.close();
        outcome
    }

    async fn fetch_igdb(&self) -> Result<FetchOutcome> {
        let credentials = self.config.igdb_credentials()?;
        let access_token = match credentials.auth {
            IgdbAuth::AccessToken(token) => token,
            IgdbAuth::ClientSecret(secret) => {
                info!("No IGDB access token configured, requesting one");
                let http = HttpClient::with_config(
                    HttpClientConfig::builder()
                        .timeout(self.config.api_timeout)
                        .no_rate_limit()
                        .build(),
                )?;
                let token = request_app_token(
                    &http,
                    &self.config.twitch_token_url,
                    &credentials.client_id,
                    &secret,
                )
                .await;
                http.close();
                token?.access_token
            }
        };

        let client = IgdbClient::new(
            &credentials.client_id,
            &access_token,
            &self.config.igdb_settings(),
        )?
        .with_min_rating(self.config.igdb_min_rating);
        let normalizer = IgdbNormalizer::new(self.config.output_format.into());

        let outcome = BatchFetcher::new(&client, normalizer)
            .fetch_batch(self.config.fetch_limit)
            .await;

        client.close();
        outcome
    }
}
