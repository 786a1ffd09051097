//! Handlers for the `/projects` resource, including membership management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stride_core::error::CoreError;
use stride_core::pagination::{
    normalize_page, normalize_pattern, paged_response, PageRequest, PagedResponse,
    PROJECT_PAGE_SIZE,
};
use stride_core::types::DbId;
use stride_db::models::project::{CreateProject, Project, UpdateProject};
use stride_db::repositories::{CommentRepo, FeatureRepo, ProjectRepo, RunRepo, ToDoRepo, UserRepo};

use crate::access::ensure_project_access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Option<DbId>,
}

/// POST /api/v1/projects
///
/// Any authenticated user may create a project; the creator joins the
/// member set immediately so the project is visible to them.
pub async fn create(
    principal: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let new_project = input.validate()?;
    let project = ProjectRepo::create(&state.pool, principal.user_id, &new_project).await?;
    ProjectRepo::add_member(&state.pool, project.id, principal.user_id).await?;

    tracing::info!(project_id = project.id, creator = principal.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let mut project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    project.apply_update(input)?;
    let project = ProjectRepo::update(&state.pool, &project).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Deletes the project and everything beneath it, bottom-up: comments,
/// to-dos, features, runs, membership rows, then the project row itself.
pub async fn delete(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    CommentRepo::delete_by_project(&state.pool, id).await?;
    ToDoRepo::delete_by_project(&state.pool, id).await?;
    FeatureRepo::delete_by_project(&state.pool, id).await?;
    RunRepo::delete_by_project(&state.pool, id).await?;
    ProjectRepo::remove_all_members(&state.pool, id).await?;
    ProjectRepo::delete_by_id(&state.pool, id).await?;

    tracing::info!(project_id = id, "Project deleted with descendants");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/search
///
/// Privileged principals search every project; ordinary users only see
/// projects whose member set contains them.
pub async fn search(
    principal: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PagedResponse<Project>>> {
    let page = normalize_page(params.page)?;
    let pattern = normalize_pattern(params.pattern);
    let request = PageRequest::new(page, PROJECT_PAGE_SIZE);

    let result = if principal.role.is_privileged() {
        ProjectRepo::search_all(&state.pool, &pattern, request).await?
    } else {
        ProjectRepo::search_member_of(&state.pool, &principal.email, &pattern, request).await?
    };

    let response = paged_response(page, PROJECT_PAGE_SIZE, result)?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/members
///
/// Adds a user to the member set. Plain read-modify-write: concurrent
/// membership edits on the same project are not isolated from each other.
pub async fn add_member(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<StatusCode> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    let user_id = input
        .user_id
        .ok_or_else(|| AppError::Core(CoreError::Validation("user_id is required".into())))?;
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let added = ProjectRepo::add_member(&state.pool, id, user.id).await?;
    if !added {
        return Err(AppError::Core(CoreError::Conflict(
            "User is already a member of this project".into(),
        )));
    }

    tracing::info!(project_id = id, user_id, "Member added");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/projects/{id}/members/{user_id}
pub async fn remove_member(
    principal: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    let removed = ProjectRepo::remove_member(&state.pool, id, user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::Validation(
            "User is not a member of this project".into(),
        )));
    }

    tracing::info!(project_id = id, user_id, "Member removed");
    Ok(StatusCode::NO_CONTENT)
}
