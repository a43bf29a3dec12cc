use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::json;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::load_actor;
use db::models::report::{Column as ReportColumn, Entity as ReportEntity};
use db::projection;

/// GET /api/me/reports
///
/// The actor's own reports across all statuses, newest first. Owners always
/// see their own anonymous reports and edit history.
pub async fn list_my_reports(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match ReportEntity::find()
        .filter(ReportColumn::ReporterId.eq(actor.id))
        .order_by_desc(ReportColumn::CreatedAt)
        .all(db)
        .await
    {
        Ok(reports) => {
            let views: Vec<_> = reports
                .iter()
                .map(|r| projection::view_for(r, &actor))
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    json!({ "reports": views }),
                    "Your reports retrieved successfully",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("error fetching own reports: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve your reports",
                )),
            )
                .into_response()
        }
    }
}
