//! User roles as a closed enumeration.
//!
//! Roles are stored in the `user_role` Postgres enum type and dispatched on
//! the variant everywhere -- never compared as strings -- so a typo in a
//! role literal is a compile error, not a silent denial.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The three user roles known to the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    #[serde(rename = "USER")]
    #[sqlx(rename = "USER")]
    User,
    #[serde(rename = "PROJECT_MANAGER")]
    #[sqlx(rename = "PROJECT_MANAGER")]
    ProjectManager,
    #[serde(rename = "ADMIN")]
    #[sqlx(rename = "ADMIN")]
    Admin,
}

impl Role {
    /// Wire/database representations, in declaration order.
    pub const VALUES: [&'static str; 3] = ["USER", "PROJECT_MANAGER", "ADMIN"];

    /// Parse a wire value against the closed set.
    ///
    /// Unknown values are a validation error, never coerced.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "USER" => Ok(Role::User),
            "PROJECT_MANAGER" => Ok(Role::ProjectManager),
            "ADMIN" => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "invalid role '{other}', expected one of: {}",
                Self::VALUES.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::ProjectManager => "PROJECT_MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// Whether this role bypasses membership checks entirely.
    ///
    /// ADMIN is granted the same unconditional access as PROJECT_MANAGER
    /// (decision recorded in DESIGN.md).
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::ProjectManager | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_value() {
        for value in Role::VALUES {
            let role = Role::parse(value).expect("known value must parse");
            assert_eq!(role.as_str(), value);
        }
    }

    #[test]
    fn parse_rejects_unknown_value() {
        let err = Role::parse("SUPERUSER").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn manager_and_admin_are_privileged() {
        assert!(Role::ProjectManager.is_privileged());
        assert!(Role::Admin.is_privileged());
        assert!(!Role::User.is_privileged());
    }
}
