use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Serialize)]
pub struct PingResponse {
    pub status: String,
}

pub fn create_router() -> Router {
    Router::new().route("/ping", get(ping))
}

#[instrument]
async fn ping() -> impl IntoResponse {
    debug!("/ping received");
    let response = PingResponse {
        status: "alive".to_string(),
    };
    (StatusCode::OK, Json(response))
}
