use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{load_actor, moderation_error_response};
use crate::routes::reports::common::{
    CommentRequest, CreateReportRequest, VoteRequest, parse_category, parse_vote,
};
use db::models::audit_log::Model as AuditLog;
use db::models::comment::Model as CommentModel;
use db::models::report::{Model as ReportModel, NewReport};
use db::moderation;
use db::projection;

/// POST /api/reports
///
/// Creates a report in the actor's campus. The new report always starts in
/// status `reported`.
///
/// ### Responses
/// - `200 OK` with the created report
/// - `400 BAD REQUEST` with per-field `errors` on invalid input
pub async fn create_report(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateReportRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let category = match parse_category(&req.category) {
        Ok(category) => category,
        Err(e) => return moderation_error_response(e),
    };

    let new = NewReport {
        reporter_id: actor.id,
        campus_id: actor.campus_id,
        category,
        severity: req.severity,
        title: req.title,
        description: req.description,
        longitude: req.location[0],
        latitude: req.location[1],
        media_urls: req.media_urls,
        is_anonymous: req.is_anonymous,
    };

    match ReportModel::create(db, new).await {
        Ok(report) => {
            AuditLog::record(db, actor.id, "create_report", "report", report.id, None).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    projection::view_for(&report, &actor),
                    "Report created successfully",
                )),
            )
                .into_response()
        }
        Err(e) => moderation_error_response(e),
    }
}

/// POST /api/reports/{report_id}/vote
///
/// Casts or changes the actor's credibility vote. Re-casting the same vote is
/// a no-op, never an error.
pub async fn cast_vote(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let vote = match parse_vote(&req.vote) {
        Ok(vote) => vote,
        Err(e) => return moderation_error_response(e),
    };

    match ReportModel::add_vote(db, report_id, actor.id, vote).await {
        Ok(report) => {
            AuditLog::record(
                db,
                actor.id,
                "vote_report",
                "report",
                report.id,
                Some(json!({ "vote": req.vote })),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    projection::view_for(&report, &actor),
                    "Vote recorded successfully",
                )),
            )
                .into_response()
        }
        Err(e) => moderation_error_response(e),
    }
}

/// POST /api/reports/{report_id}/comments
pub async fn add_comment(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match CommentModel::create(db, report_id, actor.id, &req.content, req.is_anonymous).await {
        Ok(comment) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                projection::project_comment(&comment, &actor),
                "Comment added successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}

/// POST /api/reports/{report_id}/spam
///
/// Flags the report as spam. Open to any authenticated user; idempotent per
/// flagger. Enough distinct flags auto-move the report to `spam`.
pub async fn flag_spam(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match moderation::report_spam(db, &actor, report_id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                projection::view_for(&report, &actor),
                "Spam report recorded",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}
