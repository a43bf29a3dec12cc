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
use crate::routes::reports::common::{EditReportRequest, parse_category};
use db::models::audit_log::Model as AuditLog;
use db::models::report::{Model as ReportModel, ReportEdit};
use db::moderation::ModerationError;
use db::projection;

/// PUT /api/reports/{report_id}
///
/// Owner edit inside the edit window, while the report is still `reported`.
/// Absent fields keep their current values; the previous state is snapshotted
/// into the report's edit history.
///
/// ### Responses
/// - `200 OK` with the updated report
/// - `400 BAD REQUEST` on invalid fields
/// - `403 FORBIDDEN` when the actor is not the owner or the window expired
/// - `409 CONFLICT` once a moderator has acted on the report
pub async fn edit_report(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
    Json(req): Json<EditReportRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let report = match ReportModel::find_by_id(db, report_id).await {
        Ok(Some(report)) => report,
        Ok(None) => return moderation_error_response(ModerationError::NotFound("report")),
        Err(e) => return moderation_error_response(e.into()),
    };

    let category = match req.category.as_deref().map(parse_category).transpose() {
        Ok(category) => category,
        Err(e) => return moderation_error_response(e),
    };

    let edit = ReportEdit {
        title: req.title,
        description: req.description,
        category,
        severity: req.severity,
        media_urls: req.media_urls,
    };

    match report.apply_edit(db, actor.id, edit).await {
        Ok(updated) => {
            AuditLog::record(db, actor.id, "edit_report", "report", updated.id, None).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    projection::view_for(&updated, &actor),
                    "Report updated successfully",
                )),
            )
                .into_response()
        }
        Err(e) => moderation_error_response(e),
    }
}
