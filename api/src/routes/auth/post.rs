use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::UserResponse;
use db::models::campus::Model as CampusModel;
use db::models::user::{Model as UserModel, Role};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Campus join code handed out by campus staff.
    #[validate(length(min = 1))]
    pub join_code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Default)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

/// POST /api/auth/register
///
/// Creates a student account in the campus identified by `join_code`.
///
/// ### Responses
/// - `200 OK` with a token and the created user
/// - `400 BAD REQUEST` on malformed input or an unknown join code
/// - `409 CONFLICT` when the email is already registered
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AuthResponse>::error(e.to_string())),
        )
            .into_response();
    }

    let campus = match CampusModel::find_by_join_code(db, &req.join_code).await {
        Ok(Some(campus)) => campus,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<AuthResponse>::error("Unknown campus join code")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("database error: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthResponse>::error("Internal server error")),
            )
                .into_response();
        }
    };

    match UserModel::find_by_email(db, &req.email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<AuthResponse>::error(
                    "Email is already registered",
                )),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("database error: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthResponse>::error("Internal server error")),
            )
                .into_response();
        }
    }

    match UserModel::create(
        db,
        &req.username,
        &req.email,
        &req.password,
        Role::Student,
        campus.id,
    )
    .await
    {
        Ok(user) => {
            let (token, expires_at) = generate_jwt(&user);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    AuthResponse {
                        token,
                        expires_at,
                        user: user.into(),
                    },
                    "Account created successfully",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("failed to create user: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthResponse>::error("Failed to create account")),
            )
                .into_response()
        }
    }
}

/// POST /api/auth/login
///
/// Verifies credentials and issues a JWT.
///
/// ### Responses
/// - `200 OK` with a token and the user
/// - `401 UNAUTHORIZED` on bad credentials
/// - `403 FORBIDDEN` when the account is banned or deactivated
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    let user = match UserModel::find_by_email(db, &req.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<AuthResponse>::error("Invalid credentials")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("database error: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthResponse>::error("Internal server error")),
            )
                .into_response();
        }
    };

    if !user.verify_password(&req.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<AuthResponse>::error("Invalid credentials")),
        )
            .into_response();
    }

    if !user.is_active_and_not_banned() {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<AuthResponse>::error(
                "Account is banned or deactivated",
            )),
        )
            .into_response();
    }

    let (token, expires_at) = generate_jwt(&user);
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            AuthResponse {
                token,
                expires_at,
                user: user.into(),
            },
            "Logged in successfully",
        )),
    )
        .into_response()
}
