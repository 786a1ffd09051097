//! Route definitions for the flat `/features` resource.
//!
//! Creation and search are project-scoped and live under `/projects`;
//! feature-scoped to-do routes nest here.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{features, todos};
use crate::state::AppState;

/// Routes mounted at `/features`.
///
/// ```text
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
///
/// POST   /{feature_id}/todos          -> todos::create
/// GET    /{feature_id}/todos/search   -> todos::search
/// ```
pub fn router() -> Router<AppState> {
    let todo_routes = Router::new()
        .route("/", post(todos::create))
        .route("/search", get(todos::search));

    Router::new()
        .route(
            "/{id}",
            get(features::get_by_id)
                .put(features::update)
                .delete(features::delete),
        )
        .nest("/{feature_id}/todos", todo_routes)
}
