use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{UserResponse, load_actor, moderation_error_response};
use db::moderation;

#[derive(Debug, Deserialize)]
pub struct BanUserRequest {
    pub user_id: i64,
    pub reason: String,
}

/// POST /api/moderation/ban-user
///
/// Bans an account. Requires an admin role; a plain moderator gets `403`.
pub async fn ban_user(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BanUserRequest>,
) -> impl IntoResponse {
    let db = app_state.db();
    let actor = match load_actor(db, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match moderation::ban_user(db, &actor, req.user_id, &req.reason).await {
        Ok(banned) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(banned),
                "User banned successfully",
            )),
        )
            .into_response(),
        Err(e) => moderation_error_response(e),
    }
}
