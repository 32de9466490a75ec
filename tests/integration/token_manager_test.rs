// Integration tests for OAuth token management
//
// Runs the token manager against a fake PayU OAuth endpoint and checks
// single-flight refresh, early expiry and credential rejection.

#[path = "../helpers/mod.rs"]
mod helpers;

use futures_util::future::join_all;
use helpers::*;
use payu_gateway::gateways::TokenManager;
use payu_gateway::AppError;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager(server: &MockServer, retries: u32) -> TokenManager {
    let credentials = test_config().credentials_for(&server.uri()).unwrap();
    TokenManager::new(reqwest::Client::new(), &credentials, retries).unwrap()
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_grant(ACCESS_TOKEN, 43199).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = manager(&server, 0);
    let results = join_all((0..16).map(|_| tokens.token())).await;

    for result in results {
        assert_eq!(result.unwrap().value(), ACCESS_TOKEN);
    }
    assert_eq!(tokens.exchange_count(), 1);
}

#[tokio::test]
async fn test_abandoned_refresh_does_not_block_waiters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_grant(ACCESS_TOKEN, 43199).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let tokens = manager(&server, 0);
    let (first, second) = tokio::join!(
        tokio::time::timeout(Duration::from_millis(100), tokens.token()),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tokens.token().await
        }
    );

    assert!(first.is_err(), "first caller should have timed out");
    assert_eq!(second.unwrap().value(), ACCESS_TOKEN);
    assert_eq!(tokens.exchange_count(), 2);

    // The waiter's token is cached for later callers
    assert_eq!(tokens.token().await.unwrap().value(), ACCESS_TOKEN);
    assert_eq!(tokens.exchange_count(), 2);
}

#[tokio::test]
async fn test_credentials_are_form_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains(&format!("client_id={}", POS_ID)))
        .and(body_string_contains(&format!("client_secret={}", OAUTH_SECRET)))
        .respond_with(token_grant(ACCESS_TOKEN, 43199))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = manager(&server, 0);
    tokens.token().await.unwrap();
    tokens.token().await.unwrap();
    assert_eq!(tokens.exchange_count(), 1);
}

#[tokio::test]
async fn test_token_within_margin_is_refreshed_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_grant("short-lived", 5))
        .expect(3)
        .mount(&server)
        .await;

    let tokens = manager(&server, 0);
    for _ in 0..3 {
        assert_eq!(tokens.token().await.unwrap().value(), "short-lived");
    }
    assert_eq!(tokens.exchange_count(), 3);
}

#[tokio::test]
async fn test_token_outside_margin_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_grant("ten-seconds", 10))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = manager(&server, 0);
    let first = tokens.token().await.unwrap();
    let second = tokens.token().await.unwrap();
    assert_eq!(first.value(), second.value());
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "Bad client credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = manager(&server, 2);
    match tokens.token().await {
        Err(AppError::Credentials(msg)) => assert!(msg.contains("401")),
        other => panic!("expected credentials error, got {:?}", other.map(|t| t.value().to_string())),
    }
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_grant(ACCESS_TOKEN, 43199))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = manager(&server, 1);
    assert_eq!(tokens.token().await.unwrap().value(), ACCESS_TOKEN);
}

#[tokio::test]
async fn test_invalidate_only_drops_the_stale_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_grant(ACCESS_TOKEN, 43199))
        .expect(2)
        .mount(&server)
        .await;

    let tokens = manager(&server, 0);
    let stale = tokens.token().await.unwrap();
    tokens.invalidate(&stale).await;

    let fresh = tokens.token().await.unwrap();
    assert_eq!(tokens.exchange_count(), 2);

    let unrelated = payu_gateway::gateways::AccessToken::new(
        "someone-else",
        std::time::Instant::now(),
        Duration::from_secs(60),
    );
    tokens.invalidate(&unrelated).await;
    assert_eq!(tokens.token().await.unwrap().value(), fresh.value());
    assert_eq!(tokens.exchange_count(), 2);
}
