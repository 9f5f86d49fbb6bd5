//! Twitch client-credentials token exchange

use crate::error::{Error, Result};
use crate::http::HttpClient;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::info;

/// Twitch OAuth2 token endpoint
pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Application access token returned by the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AppToken {
    /// The bearer token
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Token type (usually "bearer")
    #[serde(default)]
    pub token_type: Option<String>,
}

impl AppToken {
    /// Expiration instant relative to `issued_at`
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in.map(|secs| issued_at + Duration::seconds(secs))
    }
}

/// Exchange a client id and secret for an application token
pub async fn request_app_token(
    http: &HttpClient,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AppToken> {
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(Error::auth("Client ID and client secret must be provided"));
    }

    let form = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "client_credentials"),
    ];

    let response = http
        .inner()
        .post(token_url)
        .form(&form)
        .send()
        .await
        .map_err(Error::Http)?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::auth(format!(
            "Token request failed with status {status}: {body}"
        )));
    }

    let token: AppToken = response.json().await.map_err(Error::Http)?;
    if token.access_token.is_empty() {
        return Err(Error::auth("Token endpoint returned an empty access token"));
    }

    match token.expires_in {
        Some(secs) => info!("Obtained IGDB access token, expires in {} hours", secs / 3600),
        None => info!("Obtained IGDB access token"),
    }

    Ok(token)
}
