//! ToDo entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::error::CoreError;
use stride_core::status::{ToDoKind, WorkStatus};
use stride_core::types::{DbId, Timestamp};
use stride_core::validation::FieldErrors;

/// A to-do row from the `todos` table. Owned by exactly one feature.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ToDo {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToDoKind,
    pub description: String,
    pub status: WorkStatus,
    pub feature_id: DbId,
    pub assignee_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new to-do under a feature.
#[derive(Debug, Deserialize)]
pub struct CreateToDo {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    /// Optional assignee; resolved (or 404) by the handler.
    pub assignee_id: Option<DbId>,
}

/// Validated insert payload. Status always starts at `New`.
#[derive(Debug)]
pub struct NewToDo {
    pub name: String,
    pub kind: ToDoKind,
    pub description: String,
    pub assignee_id: Option<DbId>,
    pub status: WorkStatus,
}

impl CreateToDo {
    /// Validate the create request.
    ///
    /// A present-but-unknown type fails immediately against the closed
    /// {task, bug} set; an absent type joins the collected required-field
    /// errors like any other field.
    pub fn validate(self) -> Result<NewToDo, CoreError> {
        let kind = match self.kind.as_deref() {
            Some(value) => Some(ToDoKind::parse(value)?),
            None => None,
        };

        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name);
        let kind = errors.require("type", kind);
        let description = errors.require_text("description", self.description);
        errors.into_result()?;

        let (Some(name), Some(kind), Some(description)) = (name, kind, description) else {
            return Err(CoreError::Internal("field validation out of sync".into()));
        };

        Ok(NewToDo {
            name,
            kind,
            description,
            assignee_id: self.assignee_id,
            status: WorkStatus::New,
        })
    }
}

/// DTO for updating an existing to-do.
#[derive(Debug, Deserialize)]
pub struct UpdateToDo {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<DbId>,
}

impl ToDo {
    /// Apply an update field-by-field; identical resubmissions are
    /// rejected with "no changes detected".
    pub fn apply_update(&mut self, input: UpdateToDo) -> Result<(), CoreError> {
        let kind = input.kind.as_deref().map(ToDoKind::parse).transpose()?;
        let status = input.status.as_deref().map(WorkStatus::parse).transpose()?;

        let mut changed = false;
        if let Some(name) = input.name {
            if name != self.name {
                self.name = name;
                changed = true;
            }
        }
        if let Some(kind) = kind {
            if kind != self.kind {
                self.kind = kind;
                changed = true;
            }
        }
        if let Some(description) = input.description {
            if description != self.description {
                self.description = description;
                changed = true;
            }
        }
        if let Some(status) = status {
            if status != self.status {
                self.status = status;
                changed = true;
            }
        }
        if let Some(assignee_id) = input.assignee_id {
            if self.assignee_id != Some(assignee_id) {
                self.assignee_id = Some(assignee_id);
                changed = true;
            }
        }

        if !changed {
            return Err(CoreError::Validation("no changes detected".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn todo() -> ToDo {
        let now = Utc::now();
        ToDo {
            id: 1,
            name: "Fix login".into(),
            kind: ToDoKind::Bug,
            description: "500 on empty password".into(),
            status: WorkStatus::New,
            feature_id: 1,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unknown_kind_fails_immediately() {
        let err = CreateToDo {
            name: None,
            kind: Some("story".into()),
            description: None,
            assignee_id: None,
        }
        .validate()
        .unwrap_err();
        // The enum failure preempts the missing-field collection.
        let msg = err.to_string();
        assert!(msg.contains("invalid type 'story'"));
        assert!(!msg.contains("name is required"));
    }

    #[test]
    fn missing_kind_is_collected_with_other_fields() {
        let err = CreateToDo {
            name: None,
            kind: None,
            description: Some("d".into()),
            assignee_id: None,
        }
        .validate()
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name is required"));
        assert!(msg.contains("type is required"));
    }

    #[test]
    fn status_change_is_applied() {
        let mut todo = todo();
        todo.apply_update(UpdateToDo {
            name: None,
            kind: None,
            description: None,
            status: Some("Completed".into()),
            assignee_id: None,
        })
        .unwrap();
        assert_eq!(todo.status, WorkStatus::Completed);
    }

    #[test]
    fn assigning_same_assignee_is_no_change() {
        let mut todo = todo();
        todo.assignee_id = Some(9);
        let err = todo
            .apply_update(UpdateToDo {
                name: None,
                kind: None,
                description: None,
                status: None,
                assignee_id: Some(9),
            })
            .unwrap_err();
        assert!(err.to_string().contains("no changes detected"));
    }
}
