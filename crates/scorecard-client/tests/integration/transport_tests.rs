use std::time::{Duration, Instant};

use scorecard_client::{TransportConfig, build_transport};
use scorecard_core::{AppError, GitHubClient, RateLimitConfig};

use crate::common::spawn_api;

fn config(api_url: &str, token: Option<&str>) -> TransportConfig {
    TransportConfig {
        token: token.map(String::from),
        api_url: api_url.to_string(),
        timeout: Duration::from_secs(10),
        rate_limit: RateLimitConfig::default(),
    }
}

#[tokio::test]
async fn repeated_get_is_served_from_cache() {
    let (base, hits) = spawn_api().await;
    let transport = build_transport(&config(&base, None)).unwrap();
    let client = GitHubClient::with_base_url(&transport, &base).unwrap();

    let first = client.list_contents("octo", "widget", "").await.unwrap();
    let second = client.list_contents("octo", "widget", "").await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first.len(), second.len());
    assert_eq!(hits.get("/repos/octo/widget/contents/"), 1);
}

#[tokio::test]
async fn not_found_is_fetched_every_time() {
    let (base, hits) = spawn_api().await;
    let transport = build_transport(&config(&base, None)).unwrap();
    let client = GitHubClient::with_base_url(&transport, &base).unwrap();

    for _ in 0..2 {
        let response = client.get("missing").await.unwrap();
        assert_eq!(response.status.as_u16(), 404);
    }
    assert_eq!(hits.get("/missing"), 2);
}

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let (base, _) = spawn_api().await;
    let transport = build_transport(&config(&base, Some("ghp_secret"))).unwrap();
    let client = GitHubClient::with_base_url(&transport, &base).unwrap();

    let response = client.get("echo-auth").await.unwrap();
    assert_eq!(response.text(), "Bearer ghp_secret");
}

#[tokio::test]
async fn no_token_sends_no_authorization() {
    let (base, _) = spawn_api().await;
    let transport = build_transport(&config(&base, None)).unwrap();
    let client = GitHubClient::with_base_url(&transport, &base).unwrap();

    let response = client.get("echo-auth").await.unwrap();
    assert_eq!(response.text(), "none");
}

#[tokio::test]
async fn waits_out_exhausted_quota_then_succeeds() {
    let (base, hits) = spawn_api().await;
    let transport = build_transport(&config(&base, None)).unwrap();
    let client = GitHubClient::with_base_url(&transport, &base).unwrap();

    let started = Instant::now();
    let response = client.get("limited").await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.text(), "after reset");
    assert_eq!(hits.get("/limited"), 2);
    // Reset is at least one whole second away.
    assert!(started.elapsed() >= Duration::from_millis(500));
}

#[tokio::test]
async fn gives_up_when_reset_is_beyond_max_wait() {
    let (base, hits) = spawn_api().await;
    let mut config = config(&base, None);
    config.rate_limit.max_wait = Duration::ZERO;
    let transport = build_transport(&config).unwrap();
    let client = GitHubClient::with_base_url(&transport, &base).unwrap();

    let err = client.get("limited").await.unwrap_err();

    assert!(matches!(err, AppError::RateLimitExceeded { .. }));
    assert_eq!(hits.get("/limited"), 1);
}

#[tokio::test]
async fn malformed_rate_limit_headers_pass_through() {
    let (base, hits) = spawn_api().await;
    let transport = build_transport(&config(&base, None)).unwrap();
    let client = GitHubClient::with_base_url(&transport, &base).unwrap();

    let response = client.get("odd-headers").await.unwrap();

    assert_eq!(response.text(), "odd");
    assert_eq!(hits.get("/odd-headers"), 1);
}
