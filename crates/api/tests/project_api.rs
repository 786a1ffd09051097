//! HTTP-level integration tests for project CRUD and membership.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_hierarchy, seed_user,
};
use sqlx::PgPool;
use stride_core::role::Role;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_returns_201(pool: PgPool) {
    let (user, token) = seed_user(&pool, "creator@test.com", Role::User).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/projects",
        serde_json::json!({
            "name": "Atlas",
            "due_date": "2026-12-31T00:00:00Z",
            "description": "rewrite",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Atlas");
    assert_eq!(json["status"], "New");
    assert_eq!(json["creator_id"], user.id);
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_missing_fields(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "creator@test.com", Role::User).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/projects",
        serde_json::json!({ "description": "only this" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let message = body_json(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("name is required"));
    assert!(message.contains("due_date is required"));
}

/// The creator is a member of their own project and can read it back.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_creator_can_read_own_project(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "creator@test.com", Role::User).await;
    let hierarchy = seed_hierarchy(&pool, &token).await;

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{}", hierarchy.project_id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Fixture Project");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_project_returns_404(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "creator@test.com", Role::User).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/projects/999999",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "Project with id 999999 does not exist"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_project(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "creator@test.com", Role::User).await;
    let hierarchy = seed_hierarchy(&pool, &token).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{}", hierarchy.project_id),
        serde_json::json!({ "name": "Renamed", "status": "In progress" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Renamed");
    assert_eq!(json["status"], "In progress");
}

/// Resubmitting the current values is rejected, not silently accepted.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_project_no_changes(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "creator@test.com", Role::User).await;
    let hierarchy = seed_hierarchy(&pool, &token).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{}", hierarchy.project_id),
        serde_json::json!({ "name": "Fixture Project", "status": "New" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("no changes detected"));
}

/// Deleting a project removes the whole chain beneath it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_project_cascades(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "creator@test.com", Role::User).await;
    let hierarchy = seed_hierarchy(&pool, &token).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}", hierarchy.project_id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/v1/projects/{}", hierarchy.project_id),
        format!("/api/v1/runs/{}", hierarchy.run_id),
        format!("/api/v1/features/{}", hierarchy.feature_id),
        format!("/api/v1/todos/{}", hierarchy.todo_id),
        format!("/api/v1/comments/{}", hierarchy.comment_id),
    ] {
        let response = get_auth(common::build_test_app(pool.clone()), &uri, &token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri} should be gone");
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Adding a member grants access; adding them twice conflicts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_add_member_grants_access(pool: PgPool) {
    let (_creator, creator_token) = seed_user(&pool, "creator@test.com", Role::User).await;
    let (other, other_token) = seed_user(&pool, "other@test.com", Role::User).await;
    let hierarchy = seed_hierarchy(&pool, &creator_token).await;

    // Not yet a member -> denied.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}", hierarchy.project_id),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}/members", hierarchy.project_id),
        serde_json::json!({ "user_id": other.id }),
        &creator_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}", hierarchy.project_id),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Second add conflicts.
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{}/members", hierarchy.project_id),
        serde_json::json!({ "user_id": other.id }),
        &creator_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Removing a member revokes access; removing a non-member fails.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_remove_member_revokes_access(pool: PgPool) {
    let (_creator, creator_token) = seed_user(&pool, "creator@test.com", Role::User).await;
    let (other, other_token) = seed_user(&pool, "other@test.com", Role::User).await;
    let hierarchy = seed_hierarchy(&pool, &creator_token).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}/members", hierarchy.project_id),
        serde_json::json!({ "user_id": other.id }),
        &creator_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!(
            "/api/v1/projects/{}/members/{}",
            hierarchy.project_id, other.id
        ),
        &creator_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}", hierarchy.project_id),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Removing again fails: not a member.
    let response = delete_auth(
        common::build_test_app(pool),
        &format!(
            "/api/v1/projects/{}/members/{}",
            hierarchy.project_id, other.id
        ),
        &creator_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
