//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped run and feature routes under
//! `/projects/{project_id}/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{features, projects, runs};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                                  -> create
/// GET    /search                            -> search
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/members                      -> add_member
/// DELETE /{id}/members/{user_id}            -> remove_member
///
/// POST   /{project_id}/runs                 -> runs::create
/// GET    /{project_id}/runs/search          -> runs::search
///
/// POST   /{project_id}/features             -> features::create
/// GET    /{project_id}/features/search      -> features::search
/// ```
pub fn router() -> Router<AppState> {
    let run_routes = Router::new()
        .route("/", post(runs::create))
        .route("/search", get(runs::search));

    let feature_routes = Router::new()
        .route("/", post(features::create))
        .route("/search", get(features::search));

    Router::new()
        .route("/", post(projects::create))
        .route("/search", get(projects::search))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/members", post(projects::add_member))
        .route(
            "/{id}/members/{user_id}",
            delete(projects::remove_member),
        )
        .nest("/{project_id}/runs", run_routes)
        .nest("/{project_id}/features", feature_routes)
}
