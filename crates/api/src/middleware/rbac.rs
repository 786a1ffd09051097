//! Role-gate extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the minimum requirement. Per-resource membership checks are a
//! separate concern handled by [`crate::access`]; these gates cover the
//! user-management endpoints, which have no owning project to check
//! against.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stride_core::error::CoreError;
use stride_core::role::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(principal): RequireAdmin) -> AppResult<Json<()>> {
///     // principal is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = AuthUser::from_request_parts(parts, state).await?;
        if principal.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(principal))
    }
}

/// Requires `PROJECT_MANAGER` or `ADMIN`. Rejects with 403 Forbidden otherwise.
pub struct RequirePrivileged(pub AuthUser);

impl FromRequestParts<AppState> for RequirePrivileged {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = AuthUser::from_request_parts(parts, state).await?;
        if !principal.role.is_privileged() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Project manager or admin role required".into(),
            )));
        }
        Ok(RequirePrivileged(principal))
    }
}
