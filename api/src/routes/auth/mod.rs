//! Authentication routes: registration via campus join code, and login.

pub mod post;

use axum::{Router, routing::post as http_post};
use util::state::AppState;

use post::{login, register};

/// Builds the `/auth` route group. All endpoints are public.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", http_post(register))
        .route("/login", http_post(login))
}
