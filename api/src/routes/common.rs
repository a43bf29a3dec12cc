use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::auth::claims::Claims;
use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use db::models::user::Model as UserModel;
use db::moderation::ModerationError;

/// Thin user payload used by auth responses. Never exposes the hash.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub campus_id: i64,
    pub created_at: String,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.to_string(),
            campus_id: user.campus_id,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Maps a moderation-core error onto the HTTP surface.
///
/// - `Validation` → 400 with per-field `errors`
/// - `NotFound` → 404
/// - `AccessDenied` / `NotOwner` / `EditWindowExpired` → 403
/// - `InvalidTransition` → 409
/// - `Db` → 500 (detail logged, not leaked)
pub fn moderation_error_response(err: ModerationError) -> Response {
    match err {
        ModerationError::Validation(violations) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::validation_error(violations)),
        )
            .into_response(),
        ModerationError::NotFound(what) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error(format!("{what} not found"))),
        )
            .into_response(),
        ModerationError::AccessDenied(_)
        | ModerationError::NotOwner
        | ModerationError::EditWindowExpired => (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error(err.to_string())),
        )
            .into_response(),
        ModerationError::InvalidTransition(_) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<Empty>::error(err.to_string())),
        )
            .into_response(),
        ModerationError::Db(e) => {
            tracing::error!("database error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Internal server error")),
            )
                .into_response()
        }
    }
}

/// Loads the acting user from their token claims, rejecting stale tokens for
/// deleted accounts and locking out banned or deactivated ones.
pub async fn load_actor(
    db: &DatabaseConnection,
    claims: &Claims,
) -> Result<UserModel, Response> {
    let user = match UserModel::find_by_id(db, claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<Empty>::error("Account no longer exists")),
            )
                .into_response());
        }
        Err(e) => {
            tracing::error!("database error: {e}");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Internal server error")),
            )
                .into_response());
        }
    };

    if !user.is_active_and_not_banned() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error(
                "Account is banned or deactivated",
            )),
        )
            .into_response());
    }

    Ok(user)
}
