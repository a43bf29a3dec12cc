use axum::{Router, body::Body, http::Request};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use util::state::AppState;

use api::routes::routes;
use db::test_utils::setup_test_db;

/// Builds the full `/api` router over a fresh in-memory database.
pub async fn make_test_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let app_state = AppState::new(db.clone());
    let app = Router::new().nest("/api", routes(app_state));
    (app, db)
}

/// A bare request with an optional bearer token.
pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// A JSON request with an optional bearer token.
pub fn request_with_body(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Reads a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
