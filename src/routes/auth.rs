//! Authentication routes: login, logout, profile.

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserResponse;
use crate::services::auth as auth_service;
use crate::services::auth::AuthToken;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthToken>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = auth_service::login(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(token))
}

/// POST /api/v1/auth/logout — client-side token discard (stateless JWT)
pub async fn logout() -> Json<ApiResponse<&'static str>> {
    // The bearer token is the whole session; the client forgets it and the
    // expiry does the rest. Nothing to revoke server-side.
    ApiResponse::success("Logged out successfully")
}

/// GET /api/v1/auth/me — current user profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = auth_service::find_user_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
