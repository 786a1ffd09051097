//! Project entity model and DTOs.
//!
//! A project's member set (the `project_members` join table) is the root
//! authorization boundary for every run, feature, todo, and comment below
//! it; membership itself is managed through the repository.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::error::CoreError;
use stride_core::status::WorkStatus;
use stride_core::types::{DbId, Timestamp};
use stride_core::validation::FieldErrors;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub due_date: Timestamp,
    pub description: Option<String>,
    pub status: WorkStatus,
    pub creator_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub name: Option<String>,
    pub due_date: Option<Timestamp>,
    pub description: Option<String>,
}

/// Validated insert payload. Status always starts at `New`; the creator is
/// the authenticated principal.
#[derive(Debug)]
pub struct NewProject {
    pub name: String,
    pub due_date: Timestamp,
    pub description: Option<String>,
    pub status: WorkStatus,
}

impl CreateProject {
    pub fn validate(self) -> Result<NewProject, CoreError> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name);
        let due_date = errors.require("due_date", self.due_date);
        errors.into_result()?;

        let (Some(name), Some(due_date)) = (name, due_date) else {
            return Err(CoreError::Internal("field validation out of sync".into()));
        };

        Ok(NewProject {
            name,
            due_date,
            description: self.description,
            status: WorkStatus::New,
        })
    }
}

/// DTO for updating an existing project. All fields are optional; only
/// present fields are compared and applied.
#[derive(Debug, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub due_date: Option<Timestamp>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl Project {
    /// Apply an update field-by-field.
    ///
    /// The status value is parsed against the closed set before anything is
    /// touched. A request whose present fields all equal the current values
    /// is rejected -- resubmitting identical data is an error, not a no-op.
    pub fn apply_update(&mut self, input: UpdateProject) -> Result<(), CoreError> {
        let status = input.status.as_deref().map(WorkStatus::parse).transpose()?;

        let mut changed = false;
        if let Some(name) = input.name {
            if name != self.name {
                self.name = name;
                changed = true;
            }
        }
        if let Some(due_date) = input.due_date {
            if due_date != self.due_date {
                self.due_date = due_date;
                changed = true;
            }
        }
        if let Some(description) = input.description {
            if self.description.as_deref() != Some(description.as_str()) {
                self.description = Some(description);
                changed = true;
            }
        }
        if let Some(status) = status {
            if status != self.status {
                self.status = status;
                changed = true;
            }
        }

        if !changed {
            return Err(CoreError::Validation("no changes detected".into()));
        }
        Ok(())
    }
}
