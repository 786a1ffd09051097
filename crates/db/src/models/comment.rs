//! Comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::error::CoreError;
use stride_core::types::{DbId, Timestamp};
use stride_core::validation::FieldErrors;

/// A comment row from the `comments` table. Owned by exactly one to-do;
/// its accessibility is decided by that to-do's feature's project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub name: String,
    pub content: String,
    pub todo_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new comment under a to-do.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub name: Option<String>,
    pub content: Option<String>,
}

/// Validated insert payload.
#[derive(Debug)]
pub struct NewComment {
    pub name: String,
    pub content: String,
}

impl CreateComment {
    pub fn validate(self) -> Result<NewComment, CoreError> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name);
        let content = errors.require_text("content", self.content);
        errors.into_result()?;

        let (Some(name), Some(content)) = (name, content) else {
            return Err(CoreError::Internal("field validation out of sync".into()));
        };

        Ok(NewComment { name, content })
    }
}

/// DTO for updating an existing comment.
#[derive(Debug, Deserialize)]
pub struct UpdateComment {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl Comment {
    /// Apply an update field-by-field; identical resubmissions are
    /// rejected with "no changes detected".
    pub fn apply_update(&mut self, input: UpdateComment) -> Result<(), CoreError> {
        let mut changed = false;
        if let Some(name) = input.name {
            if name != self.name {
                self.name = name;
                changed = true;
            }
        }
        if let Some(content) = input.content {
            if content != self.content {
                self.content = content;
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

    #[test]
    fn create_requires_name_and_content() {
        let err = CreateComment {
            name: None,
            content: None,
        }
        .validate()
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name is required"));
        assert!(msg.contains("content is required"));
    }

    #[test]
    fn content_change_is_applied() {
        let now = Utc::now();
        let mut comment = Comment {
            id: 1,
            name: "review".into(),
            content: "looks good".into(),
            todo_id: 1,
            created_at: now,
            updated_at: now,
        };
        comment
            .apply_update(UpdateComment {
                name: None,
                content: Some("needs a test".into()),
            })
            .unwrap();
        assert_eq!(comment.content, "needs a test");
    }
}
