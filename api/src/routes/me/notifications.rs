use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use db::models::notification::Model as NotificationModel;

#[derive(Debug, Deserialize)]
pub struct NotificationsReq {
    pub unread_only: Option<bool>,
}

/// GET /api/me/notifications
pub async fn list_notifications(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<NotificationsReq>,
) -> impl IntoResponse {
    let db = app_state.db();

    match NotificationModel::find_for_user(db, claims.sub, params.unread_only.unwrap_or(false))
        .await
    {
        Ok(notifications) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                json!({ "notifications": notifications }),
                "Notifications retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("error fetching notifications: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve notifications",
                )),
            )
                .into_response()
        }
    }
}

/// POST /api/me/notifications/{notification_id}/read
///
/// Marks one of the actor's notifications as read. Someone else's
/// notification is a `404`, not a `403`, so ids cannot be probed.
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(notification_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    match NotificationModel::mark_read(db, notification_id, claims.sub).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Notification marked as read")),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Notification not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("error marking notification read: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Internal server error")),
            )
                .into_response()
        }
    }
}
