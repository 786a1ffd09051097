//! Repository for the `users` table.

use sqlx::PgPool;
use stride_core::pagination::{Page, PageRequest};
use stride_core::role::Role;
use stride_core::types::DbId;

use crate::models::user::{NewUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, \
                       never_connected, created_at, updated_at";

/// Provides CRUD and search operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// `never_connected` starts true: the account has a generated initial
    /// password and has never logged in.
    pub async fn create(
        pool: &PgPool,
        input: &NewUser,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, role, never_connected)
             VALUES ($1, $2, $3, $4, $5, TRUE)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(password_hash)
            .bind(input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (the identity key).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether a user with the given email already exists.
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Replace the password hash. `never_connected` is set true for an
    /// admin-forced reset and false for a self-service change.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
        never_connected: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, never_connected = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(never_connected)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Change a user's role, returning the updated row.
    pub async fn update_role(pool: &PgPool, id: DbId, role: Role) -> Result<User, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Clear the `never_connected` flag after a first successful login.
    pub async fn mark_connected(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET never_connected = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Permanently delete a user by ID. Returns `true` if a row was removed.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Search users by email substring.
    pub async fn search_by_email(
        pool: &PgPool,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<User>, sqlx::Error> {
        Self::search_by(pool, "email", pattern, page).await
    }

    /// Search users by first-name substring.
    pub async fn search_by_first_name(
        pool: &PgPool,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<User>, sqlx::Error> {
        Self::search_by(pool, "first_name", pattern, page).await
    }

    /// Search users by last-name substring.
    pub async fn search_by_last_name(
        pool: &PgPool,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<User>, sqlx::Error> {
        Self::search_by(pool, "last_name", pattern, page).await
    }

    /// One query per searchable field; `column` is one of the constants
    /// above, never caller input.
    async fn search_by(
        pool: &PgPool,
        column: &str,
        pattern: &str,
        page: PageRequest,
    ) -> Result<Page<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE {column} ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, User>(&query)
            .bind(pattern)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query =
            format!("SELECT COUNT(*) FROM users WHERE {column} ILIKE '%' || $1 || '%'");
        let total_elements = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(pattern)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            items,
            total_elements,
        })
    }
}
