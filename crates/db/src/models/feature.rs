//! Feature entity model and DTOs.
//!
//! A feature is owned by a project; the run association is optional and a
//! feature may exist before being scheduled into any run. The owning
//! project id is stored directly on the row so access checks never need to
//! go through the (possibly absent) run.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::error::CoreError;
use stride_core::status::WorkStatus;
use stride_core::types::{DbId, Timestamp};
use stride_core::validation::FieldErrors;

/// A feature row from the `features` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feature {
    pub id: DbId,
    pub name: String,
    pub description: String,
    /// Free-form type label (e.g. "frontend", "infra").
    #[serde(rename = "type")]
    pub kind: String,
    pub status: WorkStatus,
    pub run_id: Option<DbId>,
    pub project_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new feature under a project.
#[derive(Debug, Deserialize)]
pub struct CreateFeature {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Optional run to schedule the feature into; must belong to the same
    /// project (checked by the handler).
    pub run_id: Option<DbId>,
}

/// Validated insert payload. Status always starts at `New`.
#[derive(Debug)]
pub struct NewFeature {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub run_id: Option<DbId>,
    pub status: WorkStatus,
}

impl CreateFeature {
    pub fn validate(self) -> Result<NewFeature, CoreError> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name);
        let description = errors.require_text("description", self.description);
        let kind = errors.require_text("type", self.kind);
        errors.into_result()?;

        let (Some(name), Some(description), Some(kind)) = (name, description, kind) else {
            return Err(CoreError::Internal("field validation out of sync".into()));
        };

        Ok(NewFeature {
            name,
            description,
            kind,
            run_id: self.run_id,
            status: WorkStatus::New,
        })
    }
}

/// DTO for updating an existing feature.
#[derive(Debug, Deserialize)]
pub struct UpdateFeature {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

impl Feature {
    /// Apply an update field-by-field; identical resubmissions are
    /// rejected with "no changes detected".
    pub fn apply_update(&mut self, input: UpdateFeature) -> Result<(), CoreError> {
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
        if let Some(kind) = input.kind {
            if kind != self.kind {
                self.kind = kind;
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
