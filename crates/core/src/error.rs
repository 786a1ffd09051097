//! Domain error taxonomy.
//!
//! Every failure the core can produce is one of these variants; they map
//! 1:1 onto HTTP status classes at the API boundary (404 / 400 / 409 /
//! 401 / 403 / 500). Errors are raised at the point of detection and
//! propagate unrecovered -- there are no internal retries.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity is absent. The message format is part of the
    /// resolver contract relied on by clients.
    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Request body validation failure. The message may concatenate
    /// several collected field errors.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Uniqueness violation (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad or missing credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The authenticated principal lacks access to the target resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Denial message used by the access evaluator. Deliberately fixed and
    /// unstructured: callers must treat denial as terminal for the request.
    pub fn access_denied() -> Self {
        CoreError::Forbidden("Access denied".to_string())
    }
}
