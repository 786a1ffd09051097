//! Handlers for the `/comments` resource (created and searched under a
//! to-do). A comment's accessibility is decided three levels up, by its
//! to-do's feature's project.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stride_core::error::CoreError;
use stride_core::pagination::{
    normalize_page, normalize_pattern, paged_response, PageRequest, PagedResponse,
    COMMENT_PAGE_SIZE,
};
use stride_core::types::DbId;
use stride_db::models::comment::{Comment, CreateComment, UpdateComment};
use stride_db::repositories::{CommentRepo, ToDoRepo};

use crate::access::{ensure_comment_access, ensure_todo_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::state::AppState;

/// POST /api/v1/todos/{todo_id}/comments
pub async fn create(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(todo_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let todo = ToDoRepo::find_by_id(&state.pool, todo_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ToDo",
            id: todo_id,
        }))?;
    ensure_todo_access(&state.pool, &principal, &todo).await?;

    let new_comment = input.validate()?;
    let comment = CommentRepo::create(&state.pool, todo.id, &new_comment).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Comment>> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;
    ensure_comment_access(&state.pool, &principal, &comment).await?;
    Ok(Json(comment))
}

/// PUT /api/v1/comments/{id}
pub async fn update(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<Json<Comment>> {
    let mut comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;
    ensure_comment_access(&state.pool, &principal, &comment).await?;

    comment.apply_update(input)?;
    let comment = CommentRepo::update(&state.pool, &comment).await?;
    Ok(Json(comment))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;
    ensure_comment_access(&state.pool, &principal, &comment).await?;

    CommentRepo::delete_by_id(&state.pool, comment.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/todos/{todo_id}/comments/search
///
/// The pattern matches comment content, not the name.
pub async fn search(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(todo_id): Path<DbId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PagedResponse<Comment>>> {
    let todo = ToDoRepo::find_by_id(&state.pool, todo_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ToDo",
            id: todo_id,
        }))?;
    ensure_todo_access(&state.pool, &principal, &todo).await?;

    let page = normalize_page(params.page)?;
    let pattern = normalize_pattern(params.pattern);
    let request = PageRequest::new(page, COMMENT_PAGE_SIZE);

    let result = CommentRepo::search_by_content(&state.pool, todo.id, &pattern, request).await?;
    let response = paged_response(page, COMMENT_PAGE_SIZE, result)?;
    Ok(Json(response))
}
