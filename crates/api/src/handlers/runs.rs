//! Handlers for the `/runs` resource (created and searched under a project).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stride_core::error::CoreError;
use stride_core::pagination::{
    normalize_page, normalize_pattern, paged_response, PageRequest, PagedResponse, RUN_PAGE_SIZE,
};
use stride_core::types::DbId;
use stride_db::models::run::{CreateRun, Run, UpdateRun};
use stride_db::repositories::{FeatureRepo, ProjectRepo, RunRepo};

use crate::access::{ensure_project_access, ensure_run_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/runs
pub async fn create(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRun>,
) -> AppResult<(StatusCode, Json<Run>)> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    let new_run = input.validate()?;
    let run = RunRepo::create(&state.pool, project.id, &new_run).await?;
    Ok((StatusCode::CREATED, Json(run)))
}

/// GET /api/v1/runs/{id}
pub async fn get_by_id(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Run>> {
    let run = RunRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Run", id }))?;
    ensure_run_access(&state.pool, &principal, &run).await?;
    Ok(Json(run))
}

/// PUT /api/v1/runs/{id}
pub async fn update(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRun>,
) -> AppResult<Json<Run>> {
    let mut run = RunRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Run", id }))?;
    ensure_run_access(&state.pool, &principal, &run).await?;

    run.apply_update(input)?;
    let run = RunRepo::update(&state.pool, &run).await?;
    Ok(Json(run))
}

/// DELETE /api/v1/runs/{id}
///
/// Features scheduled into the run are detached, not deleted: their owner
/// is the project.
pub async fn delete(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let run = RunRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Run", id }))?;
    ensure_run_access(&state.pool, &principal, &run).await?;

    FeatureRepo::detach_from_run(&state.pool, run.id).await?;
    RunRepo::delete_by_id(&state.pool, run.id).await?;

    tracing::info!(run_id = id, "Run deleted, features detached");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{project_id}/runs/search
pub async fn search(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PagedResponse<Run>>> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    let page = normalize_page(params.page)?;
    let pattern = normalize_pattern(params.pattern);
    let request = PageRequest::new(page, RUN_PAGE_SIZE);

    let result = RunRepo::search_by_name(&state.pool, project.id, &pattern, request).await?;
    let response = paged_response(page, RUN_PAGE_SIZE, result)?;
    Ok(Json(response))
}
