//! Report routes: creation, listing, nearby search, detail, owner edits,
//! votes, comments and spam flags. All endpoints require authentication;
//! per-action policy is enforced by the moderation core.

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{get as http_get, post as http_post},
};
use util::state::AppState;

use delete::{delete_report, remove_vote};
use get::{get_report, list_comments, list_reports, nearby_reports};
use post::{add_comment, cast_vote, create_report, flag_spam};
use put::edit_report;

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", http_get(list_reports).post(create_report))
        .route("/nearby", http_get(nearby_reports))
        .route(
            "/{report_id}",
            http_get(get_report).put(edit_report).delete(delete_report),
        )
        .route("/{report_id}/vote", http_post(cast_vote).delete(remove_vote))
        .route(
            "/{report_id}/comments",
            http_get(list_comments).post(add_comment),
        )
        .route("/{report_id}/spam", http_post(flag_spam))
}
