//! Route definitions for the flat `/runs` resource.
//!
//! Creation and search are project-scoped and live under `/projects`.

use axum::routing::get;
use axum::Router;

use crate::handlers::runs;
use crate::state::AppState;

/// Routes mounted at `/runs`.
///
/// ```text
/// GET    /{id} -> get_by_id
/// PUT    /{id} -> update
/// DELETE /{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(runs::get_by_id).put(runs::update).delete(runs::delete),
    )
}
