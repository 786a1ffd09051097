//! Repository for the `features` table.

use sqlx::PgPool;
use stride_core::pagination::{Page, PageRequest};
use stride_core::types::DbId;

use crate::models::feature::{Feature, NewFeature};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, kind, status, run_id, project_id, created_at, updated_at";

/// Provides CRUD and search operations for features.
pub struct FeatureRepo;

impl FeatureRepo {
    /// Insert a new feature under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &NewFeature,
    ) -> Result<Feature, sqlx::Error> {
        let query = format!(
            "INSERT INTO features (name, description, kind, status, run_id, project_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(input.status)
            .bind(input.run_id)
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Find a feature by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Feature>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM features WHERE id = $1");
        sqlx::query_as::<_, Feature>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist an updated feature row, refreshing `updated_at`.
    pub async fn update(pool: &PgPool, feature: &Feature) -> Result<Feature, sqlx::Error> {
        let query = format!(
            "UPDATE features SET name = $2, description = $3, kind = $4, status = $5,
                                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(feature.id)
            .bind(&feature.name)
            .bind(&feature.description)
            .bind(&feature.kind)
            .bind(feature.status)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a feature by ID. Returns `true` if a row was
    /// removed. To-dos and comments below it must be deleted first.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM features WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every feature of a project (project deletion cascade).
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM features WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Detach all features from a run (run deletion). The features stay:
    /// their owner is the project, not the run.
    pub async fn detach_from_run(pool: &PgPool, run_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE features SET run_id = NULL, updated_at = NOW() WHERE run_id = $1")
            .bind(run_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Search a project's features by name substring.
    pub async fn search_by_name(
        pool: &PgPool,
        project_id: DbId,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<Feature>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM features
             WHERE project_id = $1 AND name ILIKE '%' || $2 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Feature>(&query)
            .bind(project_id)
            .bind(pattern)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total_elements = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM features WHERE project_id = $1 AND name ILIKE '%' || $2 || '%'",
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
