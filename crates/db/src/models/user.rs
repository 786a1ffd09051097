//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::error::CoreError;
use stride_core::role::Role;
use stride_core::types::{DbId, Timestamp};
use stride_core::validation::FieldErrors;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub never_connected: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub never_connected: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            never_connected: user.never_connected,
            created_at: user.created_at,
        }
    }
}

/// DTO for registering a new user. Fields are optional so validation can
/// report every missing one at once.
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Defaults to `USER` if omitted.
    pub role: Option<String>,
}

/// Validated insert payload. The password hash is supplied separately by
/// the registration handler, which generates the initial password.
#[derive(Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl RegisterUser {
    /// Validate the registration request.
    ///
    /// The role is checked against the closed set first and fails
    /// immediately; missing required fields are then collected together.
    pub fn validate(self) -> Result<NewUser, CoreError> {
        let role = match self.role.as_deref() {
            Some(value) => Role::parse(value)?,
            None => Role::User,
        };

        let mut errors = FieldErrors::new();
        let first_name = errors.require_text("first_name", self.first_name);
        let last_name = errors.require_text("last_name", self.last_name);
        let email = errors.require_text("email", self.email);
        if let Some(email) = &email {
            if !email.contains('@') {
                errors.push(format!("email '{email}' is not a valid address"));
            }
        }
        errors.into_result()?;

        let (Some(first_name), Some(last_name), Some(email)) = (first_name, last_name, email)
        else {
            return Err(CoreError::Internal("field validation out of sync".into()));
        };

        Ok(NewUser {
            first_name,
            last_name,
            email,
            role,
        })
    }
}
