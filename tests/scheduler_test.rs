// Tests for the interval schedulers' tick timing
// Uses mockito for HTTP mocking; periods are shortened to milliseconds

mod common;

use std::time::Duration;

use common::{mock_token, oauth_client, TOKEN_PATH};
use forecast_sync::keep_alive::KeepAlive;
use forecast_sync::scheduler::{start_keep_alive_scheduler, start_token_refresh_scheduler};
use forecast_sync::token_manager::TokenManager;
use mockito::{Matcher, Server};
use tokio::time::sleep;

#[tokio::test]
async fn test_token_refresh_ticks_immediately_and_survives_failure() {
    let mut server = Server::new_async().await;
    let tokens = TokenManager::new(&server.url(), oauth_client());

    let rejected = server
        .mock("POST", TOKEN_PATH)
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":"invalid_client"}"#)
        .expect(1)
        .create_async()
        .await;

    let handle = tokio::spawn(start_token_refresh_scheduler(
        tokens.clone(),
        Duration::from_millis(400),
    ));

    // first tick fires at t=0
    sleep(Duration::from_millis(100)).await;
    rejected.assert_async().await;
    assert_eq!(tokens.current().await, None);
    rejected.remove_async().await;

    let refresh = mock_token(&mut server, "fresh", 1).await;

    // second tick at one period, after the failed first call
    sleep(Duration::from_millis(450)).await;
    refresh.assert_async().await;
    assert_eq!(tokens.current().await.as_deref(), Some("fresh"));

    handle.abort();
}

#[tokio::test]
async fn test_keep_alive_waits_one_period_before_first_ping() {
    let mut server = Server::new_async().await;
    let ping = server
        .mock("GET", "/ping")
        .with_status(200)
        .with_body(r#"{"status":"alive"}"#)
        .expect(1)
        .create_async()
        .await;

    let keep_alive = KeepAlive::new(format!("{}/ping", server.url()));
    let handle = tokio::spawn(start_keep_alive_scheduler(
        keep_alive,
        Duration::from_millis(300),
    ));

    sleep(Duration::from_millis(100)).await;
    assert!(!ping.matched_async().await, "pinged before one period elapsed");

    sleep(Duration::from_millis(350)).await;
    ping.assert_async().await;

    handle.abort();
}
