//! HTTP-level integration tests for user management endpoints.
//!
//! Covers registration (with the one-time initial password), duplicate
//! email rejection, self-service password change, admin role changes,
//! forced password resets, and the role gates around all of them.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth, seed_user,
    TEST_PASSWORD,
};
use sqlx::PgPool;
use stride_core::role::Role;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// A project manager can register a user; the response carries the
/// generated initial password exactly once.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_returns_initial_password(pool: PgPool) {
    let (_pm, token) = seed_user(&pool, "pm@test.com", Role::ProjectManager).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        serde_json::json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@test.com",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "grace@test.com");
    assert_eq!(json["user"]["role"], "USER");
    assert_eq!(json["user"]["never_connected"], true);

    let initial_password = json["initial_password"].as_str().unwrap();
    assert_eq!(initial_password.len(), 12);

    // The generated password must actually work.
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "grace@test.com", "password": initial_password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Registering an email that already exists returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let (_pm, token) = seed_user(&pool, "pm@test.com", Role::ProjectManager).await;
    seed_user(&pool, "taken@test.com", Role::User).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/users",
        serde_json::json!({
            "first_name": "Dupe",
            "last_name": "User",
            "email": "taken@test.com",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Registration collects all missing required fields into one message.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_missing_fields_all_reported(pool: PgPool) {
    let (_pm, token) = seed_user(&pool, "pm@test.com", Role::ProjectManager).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/users",
        serde_json::json!({ "first_name": "OnlyFirst" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let message = body_json(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("last_name is required"));
    assert!(message.contains("email is required"));
}

/// An ordinary user may not register accounts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_requires_privileged_role(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "plain@test.com", Role::User).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/users",
        serde_json::json!({
            "first_name": "No",
            "last_name": "Chance",
            "email": "nochance@test.com",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

/// A user can change their own password and log in with the new one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password_success(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "changer@test.com", Role::User).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users/me/password",
        serde_json::json!({
            "old_password": TEST_PASSWORD,
            "new_password": "brand-new-password",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "changer@test.com", "password": "brand-new-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A wrong old password is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password_wrong_old(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "changer@test.com", Role::User).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/users/me/password",
        serde_json::json!({
            "old_password": "definitely-wrong",
            "new_password": "brand-new-password",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Reusing the old password as the new one is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password_identical_rejected(pool: PgPool) {
    let (_user, token) = seed_user(&pool, "changer@test.com", Role::User).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/users/me/password",
        serde_json::json!({
            "old_password": TEST_PASSWORD,
            "new_password": TEST_PASSWORD,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let message = body_json(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("different"));
}

// ---------------------------------------------------------------------------
// Admin operations
// ---------------------------------------------------------------------------

/// An admin can change a user's role; assigning the current role fails.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_role_change_and_no_op(pool: PgPool) {
    let (_admin, admin_token) = seed_user(&pool, "admin@test.com", Role::Admin).await;
    let (user, _) = seed_user(&pool, "promote@test.com", Role::User).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}/role", user.id),
        serde_json::json!({ "role": "PROJECT_MANAGER" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "PROJECT_MANAGER");

    // Same role again -> no changes.
    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}/role", user.id),
        serde_json::json!({ "role": "PROJECT_MANAGER" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// An unknown role value is rejected before any mutation.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_role_change_invalid_value(pool: PgPool) {
    let (_admin, admin_token) = seed_user(&pool, "admin@test.com", Role::Admin).await;
    let (user, _) = seed_user(&pool, "victim@test.com", Role::User).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}/role", user.id),
        serde_json::json!({ "role": "SUPERUSER" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", user.id),
        &admin_token,
    )
    .await;
    assert_eq!(body_json(response).await["role"], "USER");
}

/// A project manager may not change roles -- that is admin-only.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_role_change_requires_admin(pool: PgPool) {
    let (_pm, pm_token) = seed_user(&pool, "pm@test.com", Role::ProjectManager).await;
    let (user, _) = seed_user(&pool, "target@test.com", Role::User).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}/role", user.id),
        serde_json::json!({ "role": "ADMIN" }),
        &pm_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A forced reset returns a fresh one-time password and re-flags the
/// account as never connected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_forced_password_reset(pool: PgPool) {
    let (_admin, admin_token) = seed_user(&pool, "admin@test.com", Role::Admin).await;
    let (user, _) = seed_user(&pool, "reset@test.com", Role::User).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}/reset-password", user.id),
        serde_json::json!({}),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let new_password = body_json(response).await["initial_password"]
        .as_str()
        .unwrap()
        .to_string();

    // The old password no longer works, the new one does.
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "reset@test.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "reset@test.com", "password": new_password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", user.id),
        &admin_token,
    )
    .await;
    // Logging in above already cleared the flag set by the reset.
    assert_eq!(body_json(response).await["never_connected"], false);
}

/// Deleting a user clears assignments and memberships; unknown ids 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_user(pool: PgPool) {
    let (_admin, admin_token) = seed_user(&pool, "admin@test.com", Role::Admin).await;
    let (user, _) = seed_user(&pool, "gone@test.com", Role::User).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", user.id),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", user.id),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The 404 message follows the resolver contract.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_not_found_message_format(pool: PgPool) {
    let (_admin, admin_token) = seed_user(&pool, "admin@test.com", Role::Admin).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/users/999999",
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "User with id 999999 does not exist"
    );
}
