//! Repository for the `comments` table.

use sqlx::PgPool;
use stride_core::pagination::{Page, PageRequest};
use stride_core::types::DbId;

use crate::models::comment::{Comment, NewComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, content, todo_id, created_at, updated_at";

/// Provides CRUD and search operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment under a to-do, returning the created row.
    pub async fn create(
        pool: &PgPool,
        todo_id: DbId,
        input: &NewComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (name, content, todo_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.name)
            .bind(&input.content)
            .bind(todo_id)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist an updated comment row, refreshing `updated_at`.
    pub async fn update(pool: &PgPool, comment: &Comment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET name = $2, content = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(comment.id)
            .bind(&comment.name)
            .bind(&comment.content)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a comment by ID. Returns `true` if a row was removed.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every comment of a to-do (to-do deletion cascade).
    pub async fn delete_by_todo(pool: &PgPool, todo_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM comments WHERE todo_id = $1")
            .bind(todo_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete every comment below a feature (feature deletion cascade).
    pub async fn delete_by_feature(pool: &PgPool, feature_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM comments WHERE todo_id IN
                 (SELECT id FROM todos WHERE feature_id = $1)",
        )
        .bind(feature_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete every comment below a project (project deletion cascade).
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM comments WHERE todo_id IN
                 (SELECT t.id FROM todos t
                  JOIN features f ON f.id = t.feature_id
                  WHERE f.project_id = $1)",
        )
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Search a to-do's comments by content substring.
    pub async fn search_by_content(
        pool: &PgPool,
        todo_id: DbId,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE todo_id = $1 AND content ILIKE '%' || $2 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Comment>(&query)
            .bind(todo_id)
            .bind(pattern)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total_elements = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE todo_id = $1 AND content ILIKE '%' || $2 || '%'",
        )
        .bind(todo_id)
        .bind(pattern)
        .fetch_one(pool)
        .await?;

        Ok(Page {
            items,
            total_elements,
        })
    }
}
