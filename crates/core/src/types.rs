//! Primitive type aliases shared across the workspace.

/// Internal database identifier (BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp as stored in TIMESTAMPTZ columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
