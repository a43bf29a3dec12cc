//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Registration and login (public)
//! - `/reports` → Report CRUD, votes, comments, spam flags (authenticated)
//! - `/moderation` → Queue, transitions, audit, bans (moderation roles)
//! - `/me` → The caller's own reports and notifications (authenticated)

use crate::auth::guards::{allow_authenticated, allow_moderator};
use crate::routes::{
    auth::auth_routes, health::health_routes, me::me_routes, moderation::moderation_routes,
    reports::report_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod auth;
pub mod common;
pub mod health;
pub mod me;
pub mod moderation;
pub mod reports;

/// Builds the complete application router for all HTTP endpoints.
///
/// The moderator guard on `/moderation` is a role pre-check from the token;
/// the moderation core re-validates every actor against the database, so a
/// stale token cannot act through role changes or bans.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/auth",
            auth_routes().with_state(app_state.clone()),
        )
        .nest(
            "/reports",
            report_routes()
                .route_layer(from_fn(allow_authenticated))
                .with_state(app_state.clone()),
        )
        .nest(
            "/moderation",
            moderation_routes()
                .route_layer(from_fn(allow_moderator))
                .with_state(app_state.clone()),
        )
        .nest(
            "/me",
            me_routes()
                .route_layer(from_fn(allow_authenticated))
                .with_state(app_state),
        )
}
