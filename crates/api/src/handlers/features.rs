//! Handlers for the `/features` resource (created and searched under a
//! project, optionally scheduled into one of that project's runs).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stride_core::error::CoreError;
use stride_core::pagination::{
    normalize_page, normalize_pattern, paged_response, PageRequest, PagedResponse,
    FEATURE_PAGE_SIZE,
};
use stride_core::types::DbId;
use stride_db::models::feature::{CreateFeature, Feature, UpdateFeature};
use stride_db::repositories::{CommentRepo, FeatureRepo, ProjectRepo, RunRepo, ToDoRepo};

use crate::access::{ensure_feature_access, ensure_project_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/features
pub async fn create(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateFeature>,
) -> AppResult<(StatusCode, Json<Feature>)> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    let new_feature = input.validate()?;

    if let Some(run_id) = new_feature.run_id {
        let run = RunRepo::find_by_id(&state.pool, run_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Run",
                id: run_id,
            }))?;
        if run.project_id != project.id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "run {run_id} does not belong to project {project_id}"
            ))));
        }
    }

    let feature = FeatureRepo::create(&state.pool, project.id, &new_feature).await?;
    Ok((StatusCode::CREATED, Json(feature)))
}

/// GET /api/v1/features/{id}
pub async fn get_by_id(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Feature>> {
    let feature = FeatureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feature",
            id,
        }))?;
    ensure_feature_access(&state.pool, &principal, &feature).await?;
    Ok(Json(feature))
}

/// PUT /api/v1/features/{id}
pub async fn update(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFeature>,
) -> AppResult<Json<Feature>> {
    let mut feature = FeatureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feature",
            id,
        }))?;
    ensure_feature_access(&state.pool, &principal, &feature).await?;

    feature.apply_update(input)?;
    let feature = FeatureRepo::update(&state.pool, &feature).await?;
    Ok(Json(feature))
}

/// DELETE /api/v1/features/{id}
///
/// Deletes the feature's to-dos and their comments first.
pub async fn delete(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let feature = FeatureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feature",
            id,
        }))?;
    ensure_feature_access(&state.pool, &principal, &feature).await?;

    CommentRepo::delete_by_feature(&state.pool, feature.id).await?;
    ToDoRepo::delete_by_feature(&state.pool, feature.id).await?;
    FeatureRepo::delete_by_id(&state.pool, feature.id).await?;

    tracing::info!(feature_id = id, "Feature deleted with descendants");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{project_id}/features/search
pub async fn search(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PagedResponse<Feature>>> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    ensure_project_access(&state.pool, &principal, project.id).await?;

    let page = normalize_page(params.page)?;
    let pattern = normalize_pattern(params.pattern);
    let request = PageRequest::new(page, FEATURE_PAGE_SIZE);

    let result = FeatureRepo::search_by_name(&state.pool, project.id, &pattern, request).await?;
    let response = paged_response(page, FEATURE_PAGE_SIZE, result)?;
    Ok(Json(response))
}
