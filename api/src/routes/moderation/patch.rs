use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{load_actor, moderation_error_response};
use db::moderation::{self, FieldViolation, ModerationError};
use db::projection;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// `verify`, `reject` or `resolve`.
    pub action: String,
    /// Optional reason (verify/reject) or resolution details (resolve).
    pub reason: Option<String>,
}

/// PATCH /api/moderation/reports/{report_id}/status
///
/// Applies a moderation transition. `verify` and `reject` are only legal from
/// `reported`; `resolve` from any non-terminal status.
///
/// ### Responses
/// - `200 OK` with the updated report
/// - `403 FORBIDDEN` outside the actor's campus or role
/// - `409 CONFLICT` when the state machine forbids the transition
pub async fn update_status(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let reason = req.reason.as_deref();
    let result = match req.action.as_str() {
        "verify" => moderation::verify(db, &actor, report_id, reason).await,
        "reject" => moderation::reject(db, &actor, report_id, reason).await,
        "resolve" => moderation::resolve(db, &actor, report_id, reason).await,
        other => Err(ModerationError::Validation(vec![FieldViolation::new(
            "action",
            format!("'{other}' is not a valid action (expected 'verify', 'reject' or 'resolve')"),
        )])),
    };

    match result {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                projection::view_for(&report, &actor),
                "Report status updated successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub assignee_id: i64,
}

/// PATCH /api/moderation/reports/{report_id}/assign
///
/// Hands the report to a security-role user in the same campus.
pub async fn assign_report(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
    Json(req): Json<AssignRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match moderation::assign(db, &actor, report_id, req.assignee_id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                projection::view_for(&report, &actor),
                "Report assigned successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

/// PATCH /api/moderation/reports/{report_id}/notes
pub async fn set_notes(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
    Json(req): Json<NotesRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match moderation::set_notes(db, &actor, report_id, &req.notes).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                projection::view_for(&report, &actor),
                "Moderator notes updated successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}
