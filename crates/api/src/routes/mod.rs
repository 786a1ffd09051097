pub mod auth;
pub mod comments;
pub mod features;
pub mod health;
pub mod projects;
pub mod runs;
pub mod todos;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
///
/// /users                                   register (privileged)
/// /users/me                                profile self-lookup
/// /users/me/password                       self-service password change
/// /users/search                            directory search (privileged)
/// /users/{id}                              get (privileged), delete (admin)
/// /users/{id}/role                         role change (admin)
/// /users/{id}/reset-password               forced reset (admin)
///
/// /projects                                create
/// /projects/search                         search (membership-scoped)
/// /projects/{id}                           get, update, delete
/// /projects/{id}/members                   add member
/// /projects/{id}/members/{user_id}         remove member
/// /projects/{project_id}/runs              create
/// /projects/{project_id}/runs/search       search
/// /projects/{project_id}/features          create
/// /projects/{project_id}/features/search   search
///
/// /runs/{id}                               get, update, delete
///
/// /features/{id}                           get, update, delete
/// /features/{feature_id}/todos             create
/// /features/{feature_id}/todos/search      search
///
/// /todos/{id}                              get, update, delete
/// /todos/{todo_id}/comments                create
/// /todos/{todo_id}/comments/search         search
///
/// /comments/{id}                           get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/runs", runs::router())
        .nest("/features", features::router())
        .nest("/todos", todos::router())
        .nest("/comments", comments::router())
}
