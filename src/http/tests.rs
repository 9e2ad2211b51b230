//! Tests for the HTTP client module

use super::*;
use crate::config::ApiConfig;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("nhanh-extract/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .rate_limit(RateLimiterConfig::per_second(2))
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 2)));
}

#[test]
fn test_http_client_config_from_api() {
    let api = ApiConfig::new("https://pos.example.com/api", "1", "2", "t")
        .with_timeout(Duration::from_secs(12))
        .with_rate_limit(4);
    let config = HttpClientConfig::from_api(&api);

    assert_eq!(config.base_url.as_deref(), Some("https://pos.example.com/api"));
    assert_eq!(config.timeout, Duration::from_secs(12));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::per_second(4)));
    assert!(HttpClient::with_config(config).is_ok());
}

#[test]
fn test_build_url() {
    let config = HttpClientConfig::builder()
        .base_url("https://pos.example.com/api/")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(
        client.build_url("bill/search"),
        "https://pos.example.com/api/bill/search"
    );
    assert_eq!(
        client.build_url("/bill/imexs"),
        "https://pos.example.com/api/bill/imexs"
    );
    assert_eq!(
        client.build_url("https://other.example.com/x"),
        "https://other.example.com/x"
    );

    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    assert_eq!(client.build_url("bill/search"), "bill/search");
}

#[tokio::test]
async fn test_post_form_encodes_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bill/search"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("version=2.0"))
        .and(body_string_contains("appId=74951"))
        .and(body_string_contains(
            "data=%7B%22page%22%3A+1%7D",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let form = [
        ("version", "2.0"),
        ("appId", "74951"),
        ("data", r#"{"page": 1}"#),
    ];
    let body = client.post_form_text("/api/bill/search", &form).await.unwrap();

    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_post_form_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.post_form("/api/bill/search", &[("a", "b")]).await;

    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_post_form_error_body_truncated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(2000)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.post_form("/x", &[("a", "b")]).await.unwrap_err();

    if let Error::HttpStatus { body, .. } = err {
        assert_eq!(body.len(), 512);
    } else {
        panic!("Expected HttpStatus error");
    }
}

#[tokio::test]
async fn test_post_form_does_not_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.post_form("/x", &[("a", "b")]).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_post_form_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_millis(200))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.post_form_text("/slow", &[("a", "b")]).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 200 }));
}

#[tokio::test]
async fn test_post_form_connection_refused() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(2))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.post_form("/x", &[("a", "b")]).await.unwrap_err();
    assert!(err.is_transport());
}
