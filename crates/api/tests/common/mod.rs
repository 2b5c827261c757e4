#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vidhub_api::auth::jwt::JwtConfig;
use vidhub_api::auth::password::hash_password;
use vidhub_api::config::ServerConfig;
use vidhub_api::router::build_app_router;
use vidhub_api::state::AppState;
use vidhub_core::media::MediaCategory;
use vidhub_db::models::user::{CreateUser, User};
use vidhub_db::repositories::UserRepo;
use vidhub_media::cloudinary::MediaConfig;
use vidhub_media::{MediaError, MediaHost, UploadedMedia};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Cookies are not marked `Secure` and uploads stage into a per-app
/// directory under the system temp dir.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cookie_secure: false,
        upload_temp_dir: std::env::temp_dir().join(format!("vidhub-test-{}", uuid::Uuid::new_v4())),
        max_upload_bytes: 10 * 1024 * 1024,
        jwt: JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 10,
        },
        media: MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Media host stub
// ---------------------------------------------------------------------------

/// In-memory [`MediaHost`] that records every call.
///
/// Files staged with a `.mp4` extension are reported as 12.5 second videos.
#[derive(Default)]
pub struct StubMediaHost {
    pub uploaded: Mutex<Vec<String>>,
    pub destroyed: Mutex<Vec<(String, MediaCategory)>>,
    /// Reject uploads whose staged extension matches.
    pub fail_extension: Option<String>,
}

impl StubMediaHost {
    pub fn failing_on(extension: &str) -> Self {
        Self {
            fail_extension: Some(extension.to_string()),
            ..Self::default()
        }
    }

    pub fn destroyed_ids(&self) -> Vec<String> {
        self.destroyed
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[async_trait]
impl MediaHost for StubMediaHost {
    async fn upload(&self, path: &Path) -> Result<UploadedMedia, MediaError> {
        assert!(path.exists(), "staged file must exist during upload");
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_string();
        if self.fail_extension.as_deref() == Some(extension.as_str()) {
            return Err(MediaError::Api {
                status: 500,
                body: "stub failure".to_string(),
            });
        }

        let public_id = uuid::Uuid::new_v4().simple().to_string();
        let video = extension == "mp4";
        let resource = if video { "video" } else { "image" };
        self.uploaded.lock().unwrap().push(public_id.clone());

        Ok(UploadedMedia {
            url: format!("https://media.test/demo/{resource}/upload/v1/{public_id}.{extension}"),
            public_id,
            duration: video.then_some(12.5),
        })
    }

    async fn destroy(&self, public_id: &str, category: MediaCategory) -> Result<(), MediaError> {
        self.destroyed
            .lock()
            .unwrap()
            .push((public_id.to_string(), category));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router over `pool` with a fresh media stub.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_media(pool, Arc::new(StubMediaHost::default()))
}

/// Build the full application router with a caller-held media stub, so tests
/// can inspect uploads and destroys afterwards.
pub fn build_test_app_with_media(pool: PgPool, media: Arc<StubMediaHost>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` header values on a response.
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
        .collect()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET with the access token sent as the `accessToken` cookie.
pub async fn get_with_cookie(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, format!("accessToken={token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a body verbatim, for requests that are malformed on purpose.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_owned())).unwrap()).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::DELETE, uri, Some(token), body)).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "vidhub-test-boundary";

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// `(field, file name, content type, bytes)`
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(multipart_body(parts))).unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user directly; the password is [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        full_name: format!("{username} tester"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        avatar_url: format!("https://media.test/demo/image/upload/v1/{username}-avatar.png"),
        cover_image_url: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Tokens returned by a successful login.
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

/// Log in through the API and return both tokens.
pub async fn login(app: Router, username: &str) -> Session {
    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/user/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = body_json(response).await;
    Session {
        access_token: json["data"]["accessToken"].as_str().unwrap().to_string(),
        refresh_token: json["data"]["refreshToken"].as_str().unwrap().to_string(),
    }
}

/// Create a user and log them in.
pub async fn signed_in(pool: &PgPool, username: &str) -> (User, Session) {
    let user = create_user(pool, username).await;
    let session = login(build_test_app(pool.clone()), username).await;
    (user, session)
}
