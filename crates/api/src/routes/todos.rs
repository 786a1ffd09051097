//! Route definitions for the flat `/todos` resource.
//!
//! Creation and search are feature-scoped and live under `/features`;
//! to-do-scoped comment routes nest here.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comments, todos};
use crate::state::AppState;

/// Routes mounted at `/todos`.
///
/// ```text
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
///
/// POST   /{todo_id}/comments          -> comments::create
/// GET    /{todo_id}/comments/search   -> comments::search
/// ```
pub fn router() -> Router<AppState> {
    let comment_routes = Router::new()
        .route("/", post(comments::create))
        .route("/search", get(comments::search));

    Router::new()
        .route(
            "/{id}",
            get(todos::get_by_id).put(todos::update).delete(todos::delete),
        )
        .nest("/{todo_id}/comments", comment_routes)
}
