//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt::oneshot` to send requests directly to
//! the router without an actual TCP listener. The router is built through
//! the same [`build_app_router`] the production binary uses, so every test
//! exercises the full middleware stack.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stride_api::auth::jwt::{generate_token, JwtConfig};
use stride_api::auth::password::hash_password;
use stride_api::config::ServerConfig;
use stride_api::router::build_app_router;
use stride_api::state::AppState;
use stride_core::role::Role;
use stride_core::types::DbId;
use stride_db::models::user::{NewUser, User};
use stride_db::repositories::UserRepo;

/// Plaintext password shared by all seeded test users.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_days: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// User seeding
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return the row plus a valid
/// bearer token for it.
pub async fn seed_user(pool: &PgPool, email: &str, role: Role) -> (User, String) {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let input = NewUser {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        role,
    };
    let user = UserRepo::create(pool, &input, &hashed)
        .await
        .expect("user creation should succeed");
    let token = generate_token(user.id, &user.email, user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, "GET", uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, "GET", uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, "POST", uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, "POST", uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, "PUT", uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, "DELETE", uri, Some(token), None).await
}

/// Collect and parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Hierarchy seeding (via the API, as a member of the project)
// ---------------------------------------------------------------------------

/// Ids of one full entity chain: project -> run -> feature -> todo -> comment.
pub struct Hierarchy {
    pub project_id: DbId,
    pub run_id: DbId,
    pub feature_id: DbId,
    pub todo_id: DbId,
    pub comment_id: DbId,
}

/// Create a full entity chain through the API using the given token.
///
/// The token's user becomes the project creator (and therefore a member).
pub async fn seed_hierarchy(pool: &PgPool, token: &str) -> Hierarchy {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({"name": "Fixture Project", "due_date": "2026-12-31T00:00:00Z"}),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/runs"),
        serde_json::json!({
            "name": "Fixture Run",
            "description": "seeded",
            "start_date": "2026-01-01T00:00:00Z",
            "end_date": "2026-02-01T00:00:00Z",
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let run_id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/features"),
        serde_json::json!({
            "name": "Fixture Feature",
            "description": "seeded",
            "type": "backend",
            "run_id": run_id,
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let feature_id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/features/{feature_id}/todos"),
        serde_json::json!({
            "name": "Fixture ToDo",
            "type": "task",
            "description": "seeded",
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let todo_id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/todos/{todo_id}/comments"),
        serde_json::json!({"name": "Fixture Comment", "content": "seeded"}),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment_id = body_json(response).await["id"].as_i64().unwrap();

    Hierarchy {
        project_id,
        run_id,
        feature_id,
        todo_id,
        comment_id,
    }
}
