//! `/me` routes: the authenticated user's own reports and notifications.

pub mod notifications;
pub mod reports;

use axum::{
    Router,
    routing::{get as http_get, post as http_post},
};
use util::state::AppState;

use notifications::{list_notifications, mark_notification_read};
use reports::list_my_reports;

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", http_get(list_my_reports))
        .route("/notifications", http_get(list_notifications))
        .route(
            "/notifications/{notification_id}/read",
            http_post(mark_notification_read),
        )
}
