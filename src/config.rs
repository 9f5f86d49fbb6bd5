//! Environment-driven configuration
//!
//! Every setting comes from an environment variable (a `.env` file is loaded
//! by the binary before this runs). Values that are present but unparsable are
//! rejected; absent or blank values fall back to their defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `RAWG_API_KEY` | required for RAWG |
//! | `IGDB_CLIENT_ID` | required for IGDB |
//! | `IGDB_ACCESS_TOKEN` / `IGDB_CLIENT_SECRET` | one required for IGDB |
//! | `API_RATE_LIMIT` | `1.0` |
//! | `IGDB_RATE_LIMIT` | `0.25` |
//! | `API_TIMEOUT` | `30` |
//! | `DATA_DIR` | `data` |
//! | `FETCH_LIMIT` | `100` |
//! | `IGDB_MIN_RATING` | `70` |
//! | `RAWG_FETCH_DETAILS` | `false` |
//! | `OUTPUT_FORMAT` | `json` |
//! | `LOG_LEVEL` | `INFO` |
//! | `LOG_TO_FILE` | `true` |
//! | `LOG_FILE` | `logs/pipeline.log` |
//! | `RAWG_BASE_URL`, `IGDB_BASE_URL`, `TWITCH_TOKEN_URL` | public endpoints |

use crate::auth::TWITCH_TOKEN_URL;
use crate::catalog::{ClientSettings, IGDB_BASE_URL, RAWG_BASE_URL};
use crate::error::{Error, Result};
use crate::http::{RateLimiterConfig, MAX_INTERVAL};
use crate::logging::LogSettings;
use crate::output::OutputFormat;
use crate::types::OptionStringExt;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// How the IGDB bearer token is obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgdbAuth {
    /// A ready-made access token
    AccessToken(String),
    /// A client secret to exchange for a token
    ClientSecret(String),
}

/// IGDB credentials resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgdbCredentials {
    /// Twitch client id
    pub client_id: String,
    /// Token or secret
    pub auth: IgdbAuth,
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub rawg_api_key: Option<String>,
    pub igdb_client_id: Option<String>,
    pub igdb_access_token: Option<String>,
    pub igdb_client_secret: Option<String>,
    /// Seconds between RAWG requests
    pub rawg_rate_limit: f64,
    /// Seconds between IGDB requests
    pub igdb_rate_limit: f64,
    pub api_timeout: Duration,
    pub data_dir: PathBuf,
    /// Target number of records per source, always positive
    pub fetch_limit: i64,
    pub igdb_min_rating: f64,
    /// Fetch each RAWG game's detail payload
    pub rawg_fetch_details: bool,
    pub output_format: OutputFormat,
    pub log: LogSettings,
    pub rawg_base_url: String,
    pub igdb_base_url: String,
    pub twitch_token_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rawg_api_key: None,
            igdb_client_id: None,
            igdb_access_token: None,
            igdb_client_secret: None,
            rawg_rate_limit: 1.0,
            igdb_rate_limit: 0.25,
            api_timeout: Duration::from_secs(30),
            data_dir: PathBuf::from("data"),
            fetch_limit: 100,
            igdb_min_rating: 70.0,
            rawg_fetch_details: false,
            output_format: OutputFormat::Json,
            log: LogSettings::default(),
            rawg_base_url: RAWG_BASE_URL.to_string(),
            igdb_base_url: IGDB_BASE_URL.to_string(),
            twitch_token_url: TWITCH_TOKEN_URL.to_string(),
        }
    }
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = EnvReader { lookup };
        let defaults = Self::default();

        let config = Self {
            rawg_api_key: vars.string("RAWG_API_KEY"),
            igdb_client_id: vars.string("IGDB_CLIENT_ID"),
            igdb_access_token: vars.string("IGDB_ACCESS_TOKEN"),
            igdb_client_secret: vars.string("IGDB_CLIENT_SECRET"),
            rawg_rate_limit: vars.parse("API_RATE_LIMIT")?.unwrap_or(defaults.rawg_rate_limit),
            igdb_rate_limit: vars.parse("IGDB_RATE_LIMIT")?.unwrap_or(defaults.igdb_rate_limit),
            api_timeout: vars
                .parse::<f64>("API_TIMEOUT")?
                .map(|secs| seconds("API_TIMEOUT", secs))
                .transpose()?
                .unwrap_or(defaults.api_timeout),
            data_dir: vars.string("DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            fetch_limit: vars.parse("FETCH_LIMIT")?.unwrap_or(defaults.fetch_limit),
            igdb_min_rating: vars.parse("IGDB_MIN_RATING")?.unwrap_or(defaults.igdb_min_rating),
            rawg_fetch_details: vars
                .bool("RAWG_FETCH_DETAILS")?
                .unwrap_or(defaults.rawg_fetch_details),
            output_format: vars.parse("OUTPUT_FORMAT")?.unwrap_or(defaults.output_format),
            log: LogSettings {
                level: vars.string("LOG_LEVEL").unwrap_or(defaults.log.level),
                to_file: vars.bool("LOG_TO_FILE")?.unwrap_or(defaults.log.to_file),
                file: vars.string("LOG_FILE").map_or(defaults.log.file, PathBuf::from),
            },
            rawg_base_url: vars.string("RAWG_BASE_URL").unwrap_or(defaults.rawg_base_url),
            igdb_base_url: vars.string("IGDB_BASE_URL").unwrap_or(defaults.igdb_base_url),
            twitch_token_url: vars
                .string("TWITCH_TOKEN_URL")
                .unwrap_or(defaults.twitch_token_url),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and endpoint URLs
    pub fn validate(&self) -> Result<()> {
        if self.fetch_limit <= 0 {
            return Err(Error::invalid_value(
                "FETCH_LIMIT",
                format!("must be a positive integer, got {}", self.fetch_limit),
            ));
        }

        for (field, value) in [
            ("API_RATE_LIMIT", self.rawg_rate_limit),
            ("IGDB_RATE_LIMIT", self.igdb_rate_limit),
        ] {
            interval(field, value)?;
        }

        if !self.igdb_min_rating.is_finite() {
            return Err(Error::invalid_value("IGDB_MIN_RATING", "must be a number"));
        }

        for (field, value) in [
            ("RAWG_BASE_URL", &self.rawg_base_url),
            ("IGDB_BASE_URL", &self.igdb_base_url),
            ("TWITCH_TOKEN_URL", &self.twitch_token_url),
        ] {
            Url::parse(value).map_err(|e| Error::invalid_value(field, e.to_string()))?;
        }

        Ok(())
    }

    /// RAWG API key, required before any RAWG request
    pub fn rawg_credentials(&self) -> Result<&str> {
        self.rawg_api_key
            .as_deref()
            .ok_or_else(|| Error::missing_field("RAWG_API_KEY"))
    }

    /// IGDB client id plus an access token or a client secret
    pub fn igdb_credentials(&self) -> Result<IgdbCredentials> {
        let client_id = self
            .igdb_client_id
            .clone()
            .ok_or_else(|| Error::missing_field("IGDB_CLIENT_ID"))?;

        let auth = match (&self.igdb_access_token, &self.igdb_client_secret) {
            (Some(token), _) => IgdbAuth::AccessToken(token.clone()),
            (None, Some(secret)) => IgdbAuth::ClientSecret(secret.clone()),
            (None, None) => return Err(Error::missing_field("IGDB_ACCESS_TOKEN")),
        };

        Ok(IgdbCredentials { client_id, auth })
    }

    /// Connection settings for the RAWG client
    pub fn rawg_settings(&self) -> ClientSettings {
        ClientSettings::new(self.rawg_base_url.clone())
            .with_rate_limit(RateLimiterConfig::from_secs_f64(self.rawg_rate_limit))
            .with_timeout(self.api_timeout)
    }

    /// Connection settings for the IGDB client
    pub fn igdb_settings(&self) -> ClientSettings {
        ClientSettings::new(self.igdb_base_url.clone())
            .with_rate_limit(RateLimiterConfig::from_secs_f64(self.igdb_rate_limit))
            .with_timeout(self.api_timeout)
    }
}

/// Positive seconds as a duration
fn seconds(field: &str, secs: f64) -> Result<Duration> {
    if secs > 0.0 {
        to_duration(field, secs)
    } else {
        Err(Error::invalid_value(
            field,
            format!("must be a positive number of seconds, got {secs}"),
        ))
    }
}

/// Request spacing in seconds; zero disables limiting
fn interval(field: &str, secs: f64) -> Result<Duration> {
    if secs.is_nan() || secs < 0.0 {
        return Err(Error::invalid_value(
            field,
            format!("must be a non-negative number of seconds, got {secs}"),
        ));
    }
    let interval = to_duration(field, secs)?;
    if interval > MAX_INTERVAL {
        return Err(Error::invalid_value(
            field,
            format!("must be at most {} seconds, got {secs}", MAX_INTERVAL.as_secs()),
        ));
    }
    Ok(interval)
}

fn to_duration(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::invalid_value(field, format!("{secs} seconds: {e}")))
}

/// Typed access over a key lookup; blank values count as unset
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.lookup)(key).none_if_empty().map(|s| s.trim().to_string())
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.string(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| Error::invalid_value(key, format!("'{raw}': {e}")))
            })
            .transpose()
    }

    fn bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.string(key) else {
            return Ok(None);
        };
        match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::invalid_value(key, format!("'{raw}' is not a boolean"))),
        }
    }
}
