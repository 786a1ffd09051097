//! Access-control evaluator.
//!
//! Every entity below a project is authorized against exactly one thing:
//! its owning project's member set. Privileged roles (PROJECT_MANAGER and
//! ADMIN) are granted unconditionally before any lookup happens; ordinary
//! users are checked by email against the member set, and absence denies.
//!
//! Ownership chains are walked by explicit parent lookups composed
//! bottom-up -- a comment is authorized through its to-do's feature's
//! project. Denial is terminal for the request and carries a fixed
//! message.

use sqlx::PgPool;
use stride_core::error::CoreError;
use stride_core::types::DbId;
use stride_db::models::comment::Comment;
use stride_db::models::feature::Feature;
use stride_db::models::run::Run;
use stride_db::models::todo::ToDo;
use stride_db::repositories::{FeatureRepo, ProjectRepo, ToDoRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Grant or deny access to a project for the given principal.
///
/// This is the single membership check consulted at every depth of the
/// hierarchy; the other `ensure_*` functions reduce to it.
pub async fn ensure_project_access(
    pool: &PgPool,
    principal: &AuthUser,
    project_id: DbId,
) -> AppResult<()> {
    if principal.role.is_privileged() {
        return Ok(());
    }
    let member = ProjectRepo::is_member_email(pool, project_id, &principal.email).await?;
    if member {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::access_denied()))
    }
}

/// Grant or deny access to a run: owned directly by its project.
pub async fn ensure_run_access(pool: &PgPool, principal: &AuthUser, run: &Run) -> AppResult<()> {
    ensure_project_access(pool, principal, run.project_id).await
}

/// Grant or deny access to a feature: the owning project id is stored on
/// the row, so no chain walk is needed.
pub async fn ensure_feature_access(
    pool: &PgPool,
    principal: &AuthUser,
    feature: &Feature,
) -> AppResult<()> {
    ensure_project_access(pool, principal, feature.project_id).await
}

/// Grant or deny access to a to-do by walking to its owning project.
pub async fn ensure_todo_access(pool: &PgPool, principal: &AuthUser, todo: &ToDo) -> AppResult<()> {
    if principal.role.is_privileged() {
        return Ok(());
    }
    let project_id = owning_project_of_todo(pool, todo).await?;
    ensure_project_access(pool, principal, project_id).await
}

/// Grant or deny access to a comment by walking to its owning project.
pub async fn ensure_comment_access(
    pool: &PgPool,
    principal: &AuthUser,
    comment: &Comment,
) -> AppResult<()> {
    if principal.role.is_privileged() {
        return Ok(());
    }
    let project_id = owning_project_of_comment(pool, comment).await?;
    ensure_project_access(pool, principal, project_id).await
}

/// Resolve a to-do's owning project: to-do -> feature -> project.
pub async fn owning_project_of_todo(pool: &PgPool, todo: &ToDo) -> AppResult<DbId> {
    let feature = FeatureRepo::find_by_id(pool, todo.feature_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feature",
            id: todo.feature_id,
        }))?;
    Ok(feature.project_id)
}

/// Resolve a comment's owning project: comment -> to-do -> feature -> project.
pub async fn owning_project_of_comment(pool: &PgPool, comment: &Comment) -> AppResult<DbId> {
    let todo = ToDoRepo::find_by_id(pool, comment.todo_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ToDo",
            id: comment.todo_id,
        }))?;
    owning_project_of_todo(pool, &todo).await
}
