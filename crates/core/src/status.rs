//! Lifecycle status and to-do kind enumerations.
//!
//! These are the single shared definitions consumed by every validator, so
//! the valid value sets cannot drift between entity types. The wire values
//! (including the space in "In progress") match the `work_status` and
//! `todo_kind` Postgres enum labels seeded in the initial migration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status shared by projects, runs, features, and to-dos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "work_status")]
pub enum WorkStatus {
    #[serde(rename = "New")]
    #[sqlx(rename = "New")]
    New,
    #[serde(rename = "In progress")]
    #[sqlx(rename = "In progress")]
    InProgress,
    #[serde(rename = "Completed")]
    #[sqlx(rename = "Completed")]
    Completed,
}

impl WorkStatus {
    pub const VALUES: [&'static str; 3] = ["New", "In progress", "Completed"];

    /// Parse a wire value against the closed set.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "New" => Ok(WorkStatus::New),
            "In progress" => Ok(WorkStatus::InProgress),
            "Completed" => Ok(WorkStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "invalid status '{other}', expected one of: {}",
                Self::VALUES.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkStatus::New => "New",
            WorkStatus::InProgress => "In progress",
            WorkStatus::Completed => "Completed",
        }
    }
}

/// Kind of a to-do item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "todo_kind")]
pub enum ToDoKind {
    #[serde(rename = "task")]
    #[sqlx(rename = "task")]
    Task,
    #[serde(rename = "bug")]
    #[sqlx(rename = "bug")]
    Bug,
}

impl ToDoKind {
    pub const VALUES: [&'static str; 2] = ["task", "bug"];

    /// Parse a wire value against the closed set.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "task" => Ok(ToDoKind::Task),
            "bug" => Ok(ToDoKind::Bug),
            other => Err(CoreError::Validation(format!(
                "invalid type '{other}', expected one of: {}",
                Self::VALUES.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToDoKind::Task => "task",
            ToDoKind::Bug => "bug",
        }
    }
}
