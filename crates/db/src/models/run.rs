//! Run entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::error::CoreError;
use stride_core::status::WorkStatus;
use stride_core::types::{DbId, Timestamp};
use stride_core::validation::FieldErrors;

/// A run row from the `runs` table. Owned by exactly one project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Run {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: WorkStatus,
    pub project_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new run under a project.
#[derive(Debug, Deserialize)]
pub struct CreateRun {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// Validated insert payload. Status always starts at `New`.
#[derive(Debug)]
pub struct NewRun {
    pub name: String,
    pub description: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: WorkStatus,
}

impl CreateRun {
    pub fn validate(self) -> Result<NewRun, CoreError> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name);
        let description = errors.require_text("description", self.description);
        let start_date = errors.require("start_date", self.start_date);
        let end_date = errors.require("end_date", self.end_date);
        errors.into_result()?;

        let (Some(name), Some(description), Some(start_date), Some(end_date)) =
            (name, description, start_date, end_date)
        else {
            return Err(CoreError::Internal("field validation out of sync".into()));
        };

        Ok(NewRun {
            name,
            description,
            start_date,
            end_date,
            status: WorkStatus::New,
        })
    }
}

/// DTO for updating an existing run.
#[derive(Debug, Deserialize)]
pub struct UpdateRun {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub status: Option<String>,
}

impl Run {
    /// Apply an update field-by-field; see [`Project::apply_update`] for
    /// the shared contract.
    ///
    /// [`Project::apply_update`]: crate::models::project::Project::apply_update
    pub fn apply_update(&mut self, input: UpdateRun) -> Result<(), CoreError> {
        let status = input.status.as_deref().map(WorkStatus::parse).transpose()?;

        let mut changed = false;
        if let Some(name) = input.name {
            if name != self.name {
                self.name = name;
                changed = true;
            }
        }
        if let Some(description) = input.description {
            if description != self.description {
                self.description = description;
                changed = true;
            }
        }
        if let Some(start_date) = input.start_date {
            if start_date != self.start_date {
                self.start_date = start_date;
                changed = true;
            }
        }
        if let Some(end_date) = input.end_date {
            if end_date != self.end_date {
                self.end_date = end_date;
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
