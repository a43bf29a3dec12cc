use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{load_actor, moderation_error_response};
use crate::routes::reports::common::{paginated, parse_status};
use db::models::audit_log::Model as AuditLog;
use db::models::report::{Column as ReportColumn, Entity as ReportEntity, Status};
use db::moderation;
use db::projection;

/// GET /api/moderation/summary
///
/// Per-status report counts for the actor's campus.
pub async fn get_summary(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match moderation::summary(db, actor.campus_id).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                summary,
                "Moderation summary retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct QueueReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Defaults to `reported`; pass `all` to see every status.
    pub status: Option<String>,
    pub spam_only: Option<bool>,
}

/// GET /api/moderation/reports
///
/// The moderation queue for the actor's campus, oldest first so the longest
/// waiting reports surface at the top.
pub async fn list_queue(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<QueueReq>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let mut condition = Condition::all().add(ReportColumn::CampusId.eq(actor.campus_id));

    match params.status.as_deref() {
        None => condition = condition.add(ReportColumn::Status.eq(Status::Reported)),
        Some("all") => {}
        Some(raw) => match parse_status(raw) {
            Ok(status) => condition = condition.add(ReportColumn::Status.eq(status)),
            Err(e) => return moderation_error_response(e),
        },
    }

    if params.spam_only.unwrap_or(false) {
        condition = condition.add(ReportColumn::IsSpam.eq(true));
    }

    let paginator = ReportEntity::find()
        .filter(condition)
        .order_by_asc(ReportColumn::CreatedAt)
        .paginate(db, per_page);

    let total = match paginator.num_items().await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("error counting queue: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve moderation queue",
                )),
            )
                .into_response();
        }
    };

    match paginator.fetch_page(page - 1).await {
        Ok(reports) => {
            let views: Vec<_> = reports
                .iter()
                .map(|r| projection::view_for(r, &actor))
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    paginated(json!(views), page, per_page, total),
                    "Moderation queue retrieved successfully",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("error fetching queue: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve moderation queue",
                )),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuditReq {
    pub limit: Option<u64>,
    /// Narrow the trail to one report.
    pub report_id: Option<i64>,
}

/// GET /api/moderation/audit
///
/// Recent audit entries, newest first.
pub async fn get_audit_trail(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<AuditReq>,
) -> impl IntoResponse {
    let db = app_state.db();
    if let Err(resp) = load_actor(db, &claims).await {
        return resp;
    }

    let result = match params.report_id {
        Some(report_id) => AuditLog::find_for_entity(db, "report", report_id).await,
        None => AuditLog::find_recent(db, params.limit.unwrap_or(50).min(500)).await,
    };

    match result {
        Ok(entries) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                json!({ "entries": entries }),
                "Audit trail retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("error fetching audit trail: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve audit trail",
                )),
            )
                .into_response()
        }
    }
}
