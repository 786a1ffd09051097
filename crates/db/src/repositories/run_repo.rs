//! Repository for the `runs` table.

use sqlx::PgPool;
use stride_core::pagination::{Page, PageRequest};
use stride_core::types::DbId;

use crate::models::run::{NewRun, Run};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, start_date, end_date, status, project_id, created_at, updated_at";

/// Provides CRUD and search operations for runs.
pub struct RunRepo;

impl RunRepo {
    /// Insert a new run under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &NewRun,
    ) -> Result<Run, sqlx::Error> {
        let query = format!(
            "INSERT INTO runs (name, description, start_date, end_date, status, project_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Run>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status)
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Find a run by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Run>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM runs WHERE id = $1");
        sqlx::query_as::<_, Run>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist an updated run row, refreshing `updated_at`.
    pub async fn update(pool: &PgPool, run: &Run) -> Result<Run, sqlx::Error> {
        let query = format!(
            "UPDATE runs SET name = $2, description = $3, start_date = $4, end_date = $5,
                             status = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Run>(&query)
            .bind(run.id)
            .bind(&run.name)
            .bind(&run.description)
            .bind(run.start_date)
            .bind(run.end_date)
            .bind(run.status)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a run by ID. Returns `true` if a row was removed.
    /// Features attached to the run must be detached first.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM runs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every run of a project (project deletion cascade).
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM runs WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Search a project's runs by name substring.
    pub async fn search_by_name(
        pool: &PgPool,
        project_id: DbId,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<Run>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM runs
             WHERE project_id = $1 AND name ILIKE '%' || $2 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Run>(&query)
            .bind(project_id)
            .bind(pattern)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total_elements = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM runs WHERE project_id = $1 AND name ILIKE '%' || $2 || '%'",
        )
        .bind(project_id)
        .bind(pattern)
        .fetch_one(pool)
        .await?;

        Ok(Page {
            items,
            total_elements,
        })
    }
}
