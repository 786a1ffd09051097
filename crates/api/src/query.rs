//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Generic search parameters (`?pattern=&page=`).
///
/// Both are optional: a missing pattern matches everything, a missing page
/// defaults to 0. Normalization happens in `stride_core::pagination`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub pattern: Option<String>,
    pub page: Option<i64>,
}

/// Search parameters for the user directory, which is searchable on three
/// independent fields.
#[derive(Debug, Deserialize)]
pub struct UserSearchParams {
    /// One of `email`, `first_name`, `last_name`. Defaults to `email`.
    pub field: Option<String>,
    pub pattern: Option<String>,
    pub page: Option<i64>,
}
