//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use stride_core::error::CoreError;
use stride_db::models::user::UserResponse;
use stride_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a bearer token carrying the
/// subject (email) and role. A first successful login clears the
/// `never_connected` flag.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mut user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    if user.never_connected {
        UserRepo::mark_connected(&state.pool, user.id).await?;
        user.never_connected = false;
    }

    let token = generate_token(user.id, &user.email, user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.token_expiry_days * 24 * 60 * 60,
        user: user.into(),
    }))
}
