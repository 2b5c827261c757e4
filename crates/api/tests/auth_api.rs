//! HTTP-level integration tests for registration and the session lifecycle.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    body_json, get, get_auth, get_with_cookie, post_auth, post_json, post_json_auth,
    send_multipart, set_cookies, Part, StubMediaHost, TEST_PASSWORD,
};
use sqlx::PgPool;
use vidhub_db::repositories::UserRepo;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

fn registration<'a>(username: &'a str, email: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("fullName", "Alice Example"),
        Part::Text("email", email),
        Part::Text("username", username),
        Part::Text("password", TEST_PASSWORD),
        Part::File("avatar", "me.png", "image/png", PNG),
    ]
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_user_without_credentials(pool: PgPool) {
    let media = Arc::new(StubMediaHost::default());
    let app = common::build_test_app_with_media(pool.clone(), Arc::clone(&media));

    let response = send_multipart(
        app,
        Method::POST,
        "/api/v1/user/register",
        &registration("Alice", "Alice@Example.com"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 201);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["email"], "alice@example.com");
    assert!(json["data"]["avatar"].as_str().unwrap().starts_with("https://media.test/"));
    assert!(json["data"]["coverImage"].is_null());

    let data = json["data"].as_object().unwrap();
    for forbidden in ["password", "passwordHash", "refreshToken", "refreshTokenHash"] {
        assert!(!data.contains_key(forbidden), "{forbidden} must not be exposed");
    }

    assert_eq!(media.uploaded.lock().unwrap().len(), 1);
    assert!(UserRepo::find_by_login(&pool, "alice").await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_username_returns_409(pool: PgPool) {
    common::create_user(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = send_multipart(
        app,
        Method::POST,
        "/api/v1/user/register",
        &registration("ALICE", "other@example.com"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["errors"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_non_image_avatar(pool: PgPool) {
    let media = Arc::new(StubMediaHost::default());
    let app = common::build_test_app_with_media(pool, Arc::clone(&media));

    let parts = vec![
        Part::Text("fullName", "Alice Example"),
        Part::Text("email", "alice@example.com"),
        Part::Text("username", "alice"),
        Part::Text("password", TEST_PASSWORD),
        Part::File("avatar", "notes.txt", "text/plain", b"hello"),
    ];
    let response =
        send_multipart(app, Method::POST, "/api/v1/user/register", &parts, None).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(media.uploaded.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_without_avatar_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut parts = registration("alice", "alice@example.com");
    parts.pop();

    let response =
        send_multipart(app, Method::POST, "/api/v1/user/register", &parts, None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "avatar file is required");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_sets_http_only_cookies(pool: PgPool) {
    let user = common::create_user(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ALICE@test.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/user/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert!(json["data"]["accessToken"].is_string());
    assert!(json["data"]["refreshToken"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_wrong_password_returns_401_without_cookies(pool: PgPool) {
    common::create_user(&pool, "alice").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "username": "alice", "password": "not-the-password" });
    let response = post_json(app, "/api/v1/user/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());

    // No refresh token was stored.
    let user = UserRepo::find_by_login(&pool, "alice").await.unwrap().unwrap();
    assert!(user.refresh_token_hash.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_unknown_user_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "ghost", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/user/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Session middleware
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/user/current-user").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 401);
    assert_eq!(json["success"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn access_token_is_accepted_from_cookie_or_header(pool: PgPool) {
    let (user, session) = common::signed_in(&pool, "alice").await;

    let response = get_with_cookie(
        common::build_test_app(pool.clone()),
        "/api/v1/user/current-user",
        &session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], user.id);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/user/current-user",
        &session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_token_is_not_an_access_token(pool: PgPool) {
    let (_user, session) = common::signed_in(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/user/current-user", &session.refresh_token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Refresh rotation and logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_and_old_token_is_rejected(pool: PgPool) {
    let (_user, session) = common::signed_in(&pool, "alice").await;

    let body = serde_json::json!({ "refreshToken": session.refresh_token });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/user/refresh-token",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response).len(), 2);
    let json = body_json(response).await;
    let rotated = json["data"]["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, session.refresh_token);

    // Replaying the original token fails.
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/user/refresh-token",
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rotated one still works exactly once.
    let body = serde_json::json!({ "refreshToken": rotated });
    let response = post_json(common::build_test_app(pool), "/api/v1/user/refresh-token", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/user/refresh-token", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_token(pool: PgPool) {
    let (user, session) = common::signed_in(&pool, "alice").await;

    let response = post_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/user/logout",
        &session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.refresh_token_hash.is_none());

    let body = serde_json::json!({ "refreshToken": session.refresh_token });
    let response = post_json(common::build_test_app(pool), "/api/v1/user/refresh-token", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Account self-service
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_password_checks_old_password(pool: PgPool) {
    let (_user, session) = common::signed_in(&pool, "alice").await;

    let body = serde_json::json!({ "oldPassword": "wrong-password", "newPassword": "brand-new-secret" });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/user/change-password",
        body,
        &session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "oldPassword": TEST_PASSWORD, "newPassword": "brand-new-secret" });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/user/change-password",
        body,
        &session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({ "username": "alice", "password": "brand-new-secret" });
    let response = post_json(common::build_test_app(pool), "/api/v1/user/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn channel_profile_reports_subscription_state(pool: PgPool) {
    let (_alice, alice_session) = common::signed_in(&pool, "alice").await;
    let bob = common::create_user(&pool, "bob").await;

    let uri = format!("/api/v1/subscription/c/{}", bob.id);
    let response = post_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &alice_session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/user/channel/BOB",
        &alice_session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "bob");
    assert_eq!(json["data"]["subscribersCount"], 1);
    assert_eq!(json["data"]["channelsSubscribedToCount"], 0);
    assert_eq!(json["data"]["isSubscribed"], true);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/user/channel/nobody",
        &alice_session.access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
