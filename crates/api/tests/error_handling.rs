//! Tests for `AppError` to HTTP response mapping.
//!
//! The first half calls `IntoResponse` directly on `AppError` values; the
//! second half sends malformed requests through the full router.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{body_json, get_auth, post_raw, signed_in};
use http_body_util::BodyExt;
use sqlx::PgPool;
use vidhub_api::error::AppError;
use vidhub_core::error::CoreError;
use vidhub_media::MediaError;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Envelope shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_envelope_has_fixed_shape() {
    let (status, json) = error_to_response(AppError::BadRequest("bad input".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({
            "statusCode": 400,
            "message": "bad input",
            "success": false,
            "errors": [],
        })
    );
}

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Video",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Video with id 42 not found");
}

#[tokio::test]
async fn not_found_by_name_returns_404() {
    let err = AppError::Core(CoreError::NotFoundByName {
        entity: "Channel",
        name: "ghost".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Channel 'ghost' not found");
}

#[tokio::test]
async fn status_mapping_per_variant() {
    let cases = [
        (CoreError::Validation("v".into()), StatusCode::BAD_REQUEST),
        (CoreError::Conflict("c".into()), StatusCode::CONFLICT),
        (CoreError::Unauthorized("u".into()), StatusCode::UNAUTHORIZED),
        (CoreError::Forbidden("f".into()), StatusCode::FORBIDDEN),
        (
            CoreError::UnsupportedMediaType("m".into()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (err, expected) in cases {
        let (status, json) = error_to_response(AppError::Core(err)).await;
        assert_eq!(status, expected);
        assert_eq!(json["statusCode"], expected.as_u16());
    }
}

// ---------------------------------------------------------------------------
// Internal details are not leaked
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret stack trace".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");

    let err = AppError::Media(MediaError::Api {
        status: 401,
        body: "invalid api_key abc123".into(),
    });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["message"].as_str().unwrap().contains("abc123"));
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, _json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Extractor rejections over HTTP
// ---------------------------------------------------------------------------

/// Assert `response` is a 400 error envelope and return its message.
async fn assert_bad_request_envelope(response: axum::response::Response) -> String {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 400);
    assert_eq!(json["success"], false);
    assert_eq!(json["errors"], serde_json::json!([]));
    json["message"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_body_is_an_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_raw(app, "/api/v1/user/login", "application/json", "{not json", None).await;

    let message = assert_bad_request_envelope(response).await;
    assert!(message.contains("JSON"), "message was {message}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_numeric_path_id_is_an_envelope(pool: PgPool) {
    let (_alice, session) = signed_in(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/video/abc", &session.access_token).await;

    let message = assert_bad_request_envelope(response).await;
    assert!(message.contains("abc"), "message was {message}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_query_string_is_an_envelope(pool: PgPool) {
    let (_alice, session) = signed_in(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/video?page=abc", &session.access_token).await;

    assert_bad_request_envelope(response).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_multipart_upload_is_an_envelope(pool: PgPool) {
    let (_alice, session) = signed_in(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = post_raw(
        app,
        "/api/v1/video",
        "application/json",
        r#"{"title":"t"}"#,
        Some(&session.access_token),
    )
    .await;

    assert_bad_request_envelope(response).await;
}

#[tokio::test]
async fn timeout_returns_408() {
    let (status, json) = error_to_response(AppError::Timeout).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(json["message"], "Request timed out");
}
