//! Handlers for the `/todos` resource (created and searched under a feature).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stride_core::error::CoreError;
use stride_core::pagination::{
    normalize_page, normalize_pattern, paged_response, PageRequest, PagedResponse, TODO_PAGE_SIZE,
};
use stride_core::types::DbId;
use stride_db::models::todo::{CreateToDo, ToDo, UpdateToDo};
use stride_db::repositories::{CommentRepo, FeatureRepo, ToDoRepo, UserRepo};

use crate::access::{ensure_feature_access, ensure_todo_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::state::AppState;

/// POST /api/v1/features/{feature_id}/todos
pub async fn create(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(feature_id): Path<DbId>,
    Json(input): Json<CreateToDo>,
) -> AppResult<(StatusCode, Json<ToDo>)> {
    let feature = FeatureRepo::find_by_id(&state.pool, feature_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feature",
            id: feature_id,
        }))?;
    ensure_feature_access(&state.pool, &principal, &feature).await?;

    let new_todo = input.validate()?;

    if let Some(assignee_id) = new_todo.assignee_id {
        UserRepo::find_by_id(&state.pool, assignee_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: assignee_id,
            }))?;
    }

    let todo = ToDoRepo::create(&state.pool, feature.id, &new_todo).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /api/v1/todos/{id}
pub async fn get_by_id(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ToDo>> {
    let todo = ToDoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "ToDo", id }))?;
    ensure_todo_access(&state.pool, &principal, &todo).await?;
    Ok(Json(todo))
}

/// PUT /api/v1/todos/{id}
pub async fn update(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateToDo>,
) -> AppResult<Json<ToDo>> {
    let mut todo = ToDoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "ToDo", id }))?;
    ensure_todo_access(&state.pool, &principal, &todo).await?;

    // A new assignee must exist before the mutation is applied.
    if let Some(assignee_id) = input.assignee_id {
        UserRepo::find_by_id(&state.pool, assignee_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: assignee_id,
            }))?;
    }

    todo.apply_update(input)?;
    let todo = ToDoRepo::update(&state.pool, &todo).await?;
    Ok(Json(todo))
}

/// DELETE /api/v1/todos/{id}
///
/// Deletes the to-do's comments first.
pub async fn delete(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let todo = ToDoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "ToDo", id }))?;
    ensure_todo_access(&state.pool, &principal, &todo).await?;

    CommentRepo::delete_by_todo(&state.pool, todo.id).await?;
    ToDoRepo::delete_by_id(&state.pool, todo.id).await?;

    tracing::info!(todo_id = id, "ToDo deleted with comments");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/features/{feature_id}/todos/search
pub async fn search(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(feature_id): Path<DbId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PagedResponse<ToDo>>> {
    let feature = FeatureRepo::find_by_id(&state.pool, feature_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feature",
            id: feature_id,
        }))?;
    ensure_feature_access(&state.pool, &principal, &feature).await?;

    let page = normalize_page(params.page)?;
    let pattern = normalize_pattern(params.pattern);
    let request = PageRequest::new(page, TODO_PAGE_SIZE);

    let result = ToDoRepo::search_by_name(&state.pool, feature.id, &pattern, request).await?;
    let response = paged_response(page, TODO_PAGE_SIZE, result)?;
    Ok(Json(response))
}
