//! Read endpoints for reports: campus-scoped listing, radius search, detail
//! reads (which count views) and comment listing.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::json;
use util::{config, state::AppState};

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{load_actor, moderation_error_response};
use crate::routes::reports::common::{paginated, parse_category, parse_status};
use db::models::comment::Model as CommentModel;
use db::models::report::{
    Column as ReportColumn, Entity as ReportEntity, Model as ReportModel, NearbyFilter,
};
use db::models::user::Model as UserModel;
use db::moderation::{FieldViolation, ModerationError};
use db::projection;

#[derive(Debug, Deserialize)]
pub struct ListReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub query: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub min_severity: Option<i32>,
    pub sort: Option<String>,
}

/// GET /api/reports
///
/// Paginated, campus-scoped report listing.
///
/// # Query Parameters
/// - `page` (default 1), `per_page` (default 20, max 100)
/// - `query`: matches `title` or `description`
/// - `category`, `status`, `min_severity`: filters
/// - `sort`: comma-separated fields, `-` prefix for descending.
///   Allowed: `created_at`, `updated_at`, `severity`, `views_count`.
///   Defaults to `-created_at`.
pub async fn list_reports(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<ListReq>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let mut condition = Condition::all().add(ReportColumn::CampusId.eq(actor.campus_id));

    if let Some(ref query) = params.query {
        condition = condition.add(
            Condition::any()
                .add(ReportColumn::Title.contains(query))
                .add(ReportColumn::Description.contains(query)),
        );
    }

    if let Some(ref raw) = params.category {
        match parse_category(raw) {
            Ok(category) => condition = condition.add(ReportColumn::Category.eq(category)),
            Err(e) => return moderation_error_response(e),
        }
    }

    if let Some(ref raw) = params.status {
        match parse_status(raw) {
            Ok(status) => condition = condition.add(ReportColumn::Status.eq(status)),
            Err(e) => return moderation_error_response(e),
        }
    }

    if let Some(min_severity) = params.min_severity {
        condition = condition.add(ReportColumn::Severity.gte(min_severity));
    }

    let mut query = ReportEntity::find().filter(condition);

    let mut sorted = false;
    if let Some(sort_param) = &params.sort {
        for sort in sort_param.split(',') {
            let (field, asc) = match sort.strip_prefix('-') {
                Some(rest) => (rest, false),
                None => (sort, true),
            };
            let column = match field.trim() {
                "created_at" => ReportColumn::CreatedAt,
                "updated_at" => ReportColumn::UpdatedAt,
                "severity" => ReportColumn::Severity,
                "views_count" => ReportColumn::ViewsCount,
                _ => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::<serde_json::Value>::error(
                            "Invalid field used for sorting",
                        )),
                    )
                        .into_response();
                }
            };
            query = if asc {
                query.order_by_asc(column)
            } else {
                query.order_by_desc(column)
            };
            sorted = true;
        }
    }
    if !sorted {
        query = query.order_by_desc(ReportColumn::CreatedAt);
    }

    let paginator = query.paginate(db, per_page);
    let total = match paginator.num_items().await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("error counting reports: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve reports",
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
                    "Reports retrieved successfully",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("error fetching reports: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve reports",
                )),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyReq {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters; clamped by policy to the configured range.
    pub radius: Option<f64>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub min_severity: Option<i32>,
    pub limit: Option<usize>,
}

/// GET /api/reports/nearby
///
/// Radius search around a point, closest first. The radius must fall inside
/// the configured bounds (100 m to 10 km by default).
pub async fn nearby_reports(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<NearbyReq>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let radius = params.radius.unwrap_or(1000.0);
    let (min_radius, max_radius) = (config::nearby_radius_min_m(), config::nearby_radius_max_m());
    if !radius.is_finite() || radius < min_radius || radius > max_radius {
        return moderation_error_response(ModerationError::Validation(vec![FieldViolation::new(
            "radius",
            format!("radius must be between {min_radius} and {max_radius} meters"),
        )]));
    }

    let mut filter = NearbyFilter {
        min_severity: params.min_severity,
        order_by_distance: true,
        limit: params.limit,
        ..Default::default()
    };
    if let Some(ref raw) = params.category {
        match parse_category(raw) {
            Ok(category) => filter.category = Some(category),
            Err(e) => return moderation_error_response(e),
        }
    }
    if let Some(ref raw) = params.status {
        match parse_status(raw) {
            Ok(status) => filter.status = Some(status),
            Err(e) => return moderation_error_response(e),
        }
    }

    match ReportModel::find_nearby(
        db,
        actor.campus_id,
        params.longitude,
        params.latitude,
        radius,
        &filter,
    )
    .await
    {
        Ok(hits) => {
            let views: Vec<_> = hits
                .iter()
                .map(|(report, distance)| {
                    projection::project_with_distance(
                        report,
                        projection::Capabilities::of(&actor, report),
                        *distance,
                    )
                })
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    json!({ "reports": views, "count": views.len() }),
                    "Nearby reports retrieved successfully",
                )),
            )
                .into_response()
        }
        Err(e) => moderation_error_response(e),
    }
}

/// Loads a report and hides its existence from other campuses.
async fn fetch_scoped(
    db: &sea_orm::DatabaseConnection,
    actor: &UserModel,
    report_id: i64,
) -> Result<ReportModel, ModerationError> {
    let report = ReportModel::find_by_id(db, report_id)
        .await?
        .ok_or(ModerationError::NotFound("report"))?;
    if actor.campus_id != report.campus_id && !actor.role.is_super_admin() {
        return Err(ModerationError::NotFound("report"));
    }
    Ok(report)
}

/// GET /api/reports/{report_id}
///
/// Detail read. Every call counts one view, with no per-viewer dedup.
pub async fn get_report(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let mut report = match fetch_scoped(db, &actor, report_id).await {
        Ok(report) => report,
        Err(e) => return moderation_error_response(e),
    };

    if let Err(e) = ReportModel::increment_views(db, report.id).await {
        tracing::warn!("failed to bump view count for report {}: {e}", report.id);
    } else {
        report.views_count += 1;
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            projection::view_for(&report, &actor),
            "Report retrieved successfully",
        )),
    )
        .into_response()
}

/// GET /api/reports/{report_id}/comments
pub async fn list_comments(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(report_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    if let Err(e) = fetch_scoped(db, &actor, report_id).await {
        return moderation_error_response(e);
    }

    match CommentModel::list_for_report(db, report_id).await {
        Ok(comments) => {
            let views: Vec<_> = comments
                .iter()
                .map(|c| projection::project_comment(c, &actor))
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    json!({ "comments": views }),
                    "Comments retrieved successfully",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("error fetching comments: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(
                    "Failed to retrieve comments",
                )),
            )
                .into_response()
        }
    }
}
