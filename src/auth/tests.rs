//! Tests for the auth module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use chrono::TimeZone;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plain_client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap()
}

#[tokio::test]
async fn test_request_app_token_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("client_secret=my-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "abc123",
            "expires_in": 5_184_000,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token_url = format!("{}/oauth2/token", mock_server.uri());
    let token = request_app_token(&plain_client(), &token_url, "my-client", "my-secret")
        .await
        .unwrap();

    assert_eq!(token.access_token, "abc123");
    assert_eq!(token.expires_in, Some(5_184_000));
    assert_eq!(token.token_type.as_deref(), Some("bearer"));
}

#[tokio::test]
async fn test_request_app_token_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid client secret"))
        .mount(&mock_server)
        .await;

    let token_url = format!("{}/oauth2/token", mock_server.uri());
    let err = request_app_token(&plain_client(), &token_url, "id", "bad")
        .await
        .unwrap_err();

    match err {
        Error::Auth { message } => {
            assert!(message.contains("403"));
            assert!(message.contains("invalid client secret"));
        }
        other => panic!("Expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_request_app_token_requires_credentials() {
    let err = request_app_token(&plain_client(), TWITCH_TOKEN_URL, "", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
}

#[test]
fn test_app_token_expires_at() {
    let token = AppToken {
        access_token: "t".to_string(),
        expires_in: Some(3600),
        token_type: None,
    };
    let issued = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let expires = token.expires_at(issued).unwrap();
    assert_eq!(expires, chrono::Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap());
}
