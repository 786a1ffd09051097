//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stride_core::error::CoreError;
use stride_core::role::Role;
use stride_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated principal extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// The core never authenticates -- it only authorizes. This extractor is
/// the seam where the already-validated credential turns into a principal
/// with a resolved email (identity key) and role (closed enum).
///
/// ```ignore
/// async fn my_handler(principal: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = principal.user_id, role = %principal.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.uid`).
    pub user_id: DbId,
    /// The user's email (from `claims.sub`) -- the identity key consulted
    /// by membership checks.
    pub email: String,
    /// The user's role, parsed onto the closed enum.
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role = Role::parse(&claims.role).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid role in token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.sub,
            role,
        })
    }
}
