//! Handlers for the `/users` resource.
//!
//! User management is role-gated rather than membership-gated: there is no
//! owning project to check against. Registration and the directory search
//! require a privileged role; role changes, forced password resets, and
//! deletion require ADMIN. A user always sees their own profile.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stride_core::error::CoreError;
use stride_core::pagination::{
    self, normalize_page, normalize_pattern, PageRequest, PagedResponse, USER_PAGE_SIZE,
};
use stride_core::role::Role;
use stride_core::types::DbId;
use stride_db::models::user::{RegisterUser, UserResponse};
use stride_db::repositories::{ProjectRepo, ToDoRepo, UserRepo};

use crate::auth::password::{
    generate_initial_password, hash_password, validate_password_strength, verify_password,
    MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequirePrivileged};
use crate::query::UserSearchParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response for a successful registration. The initial password is returned
/// exactly once and never retrievable again.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub user: UserResponse,
    pub initial_password: String,
}

/// Request body for `PUT /users/me/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Request body for `PUT /users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

/// Response for an admin-forced password reset.
#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub initial_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
///
/// Register a new user with an auto-generated initial password.
pub async fn register(
    RequirePrivileged(_principal): RequirePrivileged,
    State(state): State<AppState>,
    Json(input): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<RegisteredUser>)> {
    let new_user = input.validate()?;

    if UserRepo::email_exists(&state.pool, &new_user.email).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "User with email '{}' already exists",
            new_user.email
        ))));
    }

    let initial_password = generate_initial_password();
    let password_hash = hash_password(&initial_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(&state.pool, &new_user, &password_hash).await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            user: user.into(),
            initial_password,
        }),
    ))
}

/// GET /api/v1/users/me
///
/// Profile self-lookup. No access check beyond authentication.
pub async fn me(principal: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, principal.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: principal.user_id,
        }))?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/users/me/password
///
/// Self-service password change: the old password must verify, and the new
/// password must differ from it.
pub async fn change_password(
    principal: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, principal.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: principal.user_id,
        }))?;

    let old_valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::Core(CoreError::Validation(
            "old password is incorrect".into(),
        )));
    }

    if input.new_password == input.old_password {
        return Err(AppError::Core(CoreError::Validation(
            "new password must be different from the old password".into(),
        )));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash, false).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/search
///
/// Paginated directory search on one of the three searchable fields.
pub async fn search(
    RequirePrivileged(_principal): RequirePrivileged,
    State(state): State<AppState>,
    Query(params): Query<UserSearchParams>,
) -> AppResult<Json<PagedResponse<UserResponse>>> {
    let page = normalize_page(params.page)?;
    let pattern = normalize_pattern(params.pattern);
    let request = PageRequest::new(page, USER_PAGE_SIZE);

    let result = match params.field.as_deref().unwrap_or("email") {
        "email" => UserRepo::search_by_email(&state.pool, &pattern, request).await?,
        "first_name" => UserRepo::search_by_first_name(&state.pool, &pattern, request).await?,
        "last_name" => UserRepo::search_by_last_name(&state.pool, &pattern, request).await?,
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "invalid search field '{other}', expected one of: email, first_name, last_name"
            ))))
        }
    };

    let result = pagination::Page {
        items: result.items.into_iter().map(UserResponse::from).collect(),
        total_elements: result.total_elements,
    };
    let response = pagination::paged_response(page, USER_PAGE_SIZE, result)?;
    Ok(Json(response))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    RequirePrivileged(_principal): RequirePrivileged,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/users/{id}/role
///
/// Admin-driven role change. Assigning the role the user already has is
/// rejected like any other no-op update.
pub async fn update_role(
    RequireAdmin(_principal): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let role = input
        .role
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Validation("role is required".into())))?;
    let role = Role::parse(role)?;

    if role == user.role {
        return Err(AppError::Core(CoreError::Validation(
            "no changes detected".into(),
        )));
    }

    let updated = UserRepo::update_role(&state.pool, id, role).await?;
    tracing::info!(user_id = id, role = %role, "Role changed");
    Ok(Json(updated.into()))
}

/// POST /api/v1/users/{id}/reset-password
///
/// Admin-forced reset: generates a fresh initial password (returned once)
/// and marks the account as never connected again.
pub async fn reset_password(
    RequireAdmin(_principal): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ResetPasswordResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let initial_password = generate_initial_password();
    let password_hash = hash_password(&initial_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash, true).await?;

    tracing::info!(user_id = id, "Password reset by admin");
    Ok(Json(ResetPasswordResponse { initial_password }))
}

/// DELETE /api/v1/users/{id}
///
/// Removes the user after clearing to-do assignments and project
/// memberships. A user who still owns projects cannot be deleted (the
/// creator reference keeps the row alive) -- that surfaces as 409.
pub async fn delete(
    RequireAdmin(_principal): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    ToDoRepo::clear_assignee(&state.pool, id).await?;
    ProjectRepo::remove_memberships_of_user(&state.pool, id).await?;
    UserRepo::delete_by_id(&state.pool, id).await?;

    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
