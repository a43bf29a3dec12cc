//! Moderation routes. The whole group sits behind the moderator guard; every
//! operation additionally re-validates the actor and the campus boundary in
//! the moderation core.

pub mod get;
pub mod patch;
pub mod post;

use axum::{
    Router,
    routing::{get as http_get, patch as http_patch, post as http_post},
};
use util::state::AppState;

use get::{get_audit_trail, get_summary, list_queue};
use patch::{assign_report, set_notes, update_status};
use post::ban_user;

pub fn moderation_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", http_get(get_summary))
        .route("/reports", http_get(list_queue))
        .route("/reports/{report_id}/status", http_patch(update_status))
        .route("/reports/{report_id}/assign", http_patch(assign_report))
        .route("/reports/{report_id}/notes", http_patch(set_notes))
        .route("/audit", http_get(get_audit_trail))
        .route("/ban-user", http_post(ban_user))
}
