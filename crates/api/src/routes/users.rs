//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /                     -> register (privileged)
/// GET    /me                   -> me
/// PUT    /me/password          -> change_password
/// GET    /search               -> search (privileged)
/// GET    /{id}                 -> get_by_id (privileged)
/// DELETE /{id}                 -> delete (admin)
/// PUT    /{id}/role            -> update_role (admin)
/// POST   /{id}/reset-password  -> reset_password (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(users::register))
        .route("/me", get(users::me))
        .route("/me/password", put(users::change_password))
        .route("/search", get(users::search))
        .route("/{id}", get(users::get_by_id).delete(users::delete))
        .route("/{id}/role", put(users::update_role))
        .route("/{id}/reset-password", post(users::reset_password))
}
