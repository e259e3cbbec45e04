// API integration tests that verify HTTP endpoints
// Tests actual Axum router with real HTTP requests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use forecast_sync::api::create_router;
use http_body_util::BodyExt; // For `.collect()`
use serde_json::Value;
use tower::ServiceExt; // For `oneshot`

#[tokio::test]
async fn test_ping_endpoint() {
    let app = create_router();

    let response = app
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "alive" }));
}

#[tokio::test]
async fn test_ping_rejects_post() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
