//! Route definitions for the flat `/comments` resource.
//!
//! Creation and search are to-do-scoped and live under `/todos`.

use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /{id} -> get_by_id
/// PUT    /{id} -> update
/// DELETE /{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(comments::get_by_id)
            .put(comments::update)
            .delete(comments::delete),
    )
}
