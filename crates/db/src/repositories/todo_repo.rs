//! Repository for the `todos` table.

use sqlx::PgPool;
use stride_core::pagination::{Page, PageRequest};
use stride_core::types::DbId;

use crate::models::todo::{NewToDo, ToDo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, kind, description, status, feature_id, assignee_id, created_at, updated_at";

/// Provides CRUD and search operations for to-dos.
pub struct ToDoRepo;

impl ToDoRepo {
    /// Insert a new to-do under a feature, returning the created row.
    pub async fn create(
        pool: &PgPool,
        feature_id: DbId,
        input: &NewToDo,
    ) -> Result<ToDo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (name, kind, description, status, feature_id, assignee_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ToDo>(&query)
            .bind(&input.name)
            .bind(input.kind)
            .bind(&input.description)
            .bind(input.status)
            .bind(feature_id)
            .bind(input.assignee_id)
            .fetch_one(pool)
            .await
    }

    /// Find a to-do by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ToDo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, ToDo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist an updated to-do row, refreshing `updated_at`.
    pub async fn update(pool: &PgPool, todo: &ToDo) -> Result<ToDo, sqlx::Error> {
        let query = format!(
            "UPDATE todos SET name = $2, kind = $3, description = $4, status = $5,
                              assignee_id = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ToDo>(&query)
            .bind(todo.id)
            .bind(&todo.name)
            .bind(todo.kind)
            .bind(&todo.description)
            .bind(todo.status)
            .bind(todo.assignee_id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a to-do by ID. Returns `true` if a row was
    /// removed. Comments below it must be deleted first.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every to-do of a feature (feature deletion cascade).
    pub async fn delete_by_feature(pool: &PgPool, feature_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM todos WHERE feature_id = $1")
            .bind(feature_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete every to-do of a project (project deletion cascade).
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM todos WHERE feature_id IN
                 (SELECT id FROM features WHERE project_id = $1)",
        )
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Unassign a user from every to-do (user deletion).
    pub async fn clear_assignee(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE todos SET assignee_id = NULL, updated_at = NOW() WHERE assignee_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Search a feature's to-dos by name substring.
    pub async fn search_by_name(
        pool: &PgPool,
        feature_id: DbId,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<ToDo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM todos
             WHERE feature_id = $1 AND name ILIKE '%' || $2 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, ToDo>(&query)
            .bind(feature_id)
            .bind(pattern)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total_elements = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM todos WHERE feature_id = $1 AND name ILIKE '%' || $2 || '%'",
        )
        .bind(feature_id)
        .bind(pattern)
        .fetch_one(pool)
        .await?;

        Ok(Page {
            items,
            total_elements,
        })
    }
}
