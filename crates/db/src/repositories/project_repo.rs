//! Repository for the `projects` table and its `project_members` join table.

use sqlx::PgPool;
use stride_core::pagination::{Page, PageRequest};
use stride_core::types::DbId;

use crate::models::project::{NewProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, due_date, description, status, creator_id, created_at, updated_at";

/// Qualified variant for queries that join other tables.
const QUALIFIED_COLUMNS: &str = "p.id, p.name, p.due_date, p.description, p.status, \
                                 p.creator_id, p.created_at, p.updated_at";

/// Provides CRUD, membership, and search operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &NewProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, due_date, description, status, creator_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(input.due_date)
            .bind(&input.description)
            .bind(input.status)
            .bind(creator_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist an updated project row, refreshing `updated_at`.
    pub async fn update(pool: &PgPool, project: &Project) -> Result<Project, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET name = $2, due_date = $3, description = $4, status = $5,
                                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(project.id)
            .bind(&project.name)
            .bind(project.due_date)
            .bind(&project.description)
            .bind(project.status)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a project by ID. Returns `true` if a row was
    /// removed. Children and membership rows must be deleted first.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Membership -- the authorization boundary
    // -----------------------------------------------------------------------

    /// Whether the project's member set contains a user with this email.
    ///
    /// This is the single membership check consulted by the access
    /// evaluator at every depth of the hierarchy.
    pub async fn is_member_email(
        pool: &PgPool,
        project_id: DbId,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM project_members pm
                 JOIN users u ON u.id = pm.user_id
                 WHERE pm.project_id = $1 AND u.email = $2
             )",
        )
        .bind(project_id)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// Add a user to the member set. Returns `false` if already a member.
    pub async fn add_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_members (project_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a user from the member set. Returns `false` if not a member.
    pub async fn remove_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop the whole member set of a project (project deletion).
    pub async fn remove_all_members(pool: &PgPool, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Drop a user's memberships across all projects (user deletion).
    pub async fn remove_memberships_of_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_members WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Search all projects by name substring (privileged principals).
    pub async fn search_all(
        pool: &PgPool,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE name ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Project>(&query)
            .bind(pattern)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total_elements = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects WHERE name ILIKE '%' || $1 || '%'",
        )
        .bind(pattern)
        .fetch_one(pool)
        .await?;

        Ok(Page {
            items,
            total_elements,
        })
    }

    /// Search projects whose member set contains the given email, by name
    /// substring (ordinary principals only see their own projects).
    pub async fn search_member_of(
        pool: &PgPool,
        email: &str,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM projects p
             JOIN project_members pm ON pm.project_id = p.id
             JOIN users u ON u.id = pm.user_id
             WHERE u.email = $1 AND p.name ILIKE '%' || $2 || '%'
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Project>(&query)
            .bind(email)
            .bind(pattern)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total_elements = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects p
             JOIN project_members pm ON pm.project_id = p.id
             JOIN users u ON u.id = pm.user_id
             WHERE u.email = $1 AND p.name ILIKE '%' || $2 || '%'",
        )
        .bind(email)
        .bind(pattern)
        .fetch_one(pool)
        .await?;

        Ok(Page {
            items,
            total_elements,
        })
    }
}
