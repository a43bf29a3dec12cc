use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{load_actor, moderation_error_response};
use db::models::report::Model as ReportModel;
use db::moderation;
use db::projection;

/// DELETE /api/reports/{report_id}
///
/// Owner (or admin) retraction. The report moves to `invalid`; nothing is
/// physically removed.
pub async fn delete_report(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match moderation::soft_delete(db, &actor, report_id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                projection::view_for(&report, &actor),
                "Report deleted successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}

/// DELETE /api/reports/{report_id}/vote
///
/// Clears the actor's vote. Removing an absent vote is a no-op.
pub async fn remove_vote(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match ReportModel::remove_vote(db, report_id, actor.id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                projection::view_for(&report, &actor),
                "Vote removed successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}
