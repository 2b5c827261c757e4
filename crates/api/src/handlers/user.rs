//! Handlers for the `/user` resource: registration, the session lifecycle,
//! and account self-service.

use axum::body::Bytes;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidhub_core::error::CoreError;
use vidhub_core::media::MediaCategory;
use vidhub_core::pagination::Page;
use vidhub_core::validation::{normalize_handle, optional_text};
use vidhub_db::models::user::{ChannelProfile, CreateUser, PublicUser, UpdateAccount};
use vidhub_db::models::video::VideoCard;
use vidhub_db::repositories::{UserRepo, VideoRepo};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::tokens::{TokenPair, TokenService};
use crate::error::{unauthorized, AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::upload::{release_media_best_effort, upload_file, UploadForm};
use crate::handlers::validate_body;
use crate::middleware::auth::{AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Text fields of the registration form.
#[derive(Debug, Validate)]
struct RegisterFields {
    #[validate(length(min = 1, message = "fullName is required"))]
    full_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    email: String,
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    username: String,
}

/// Request body for `POST /user/login`. Either `username` or `email` names
/// the account.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Request body for `POST /user/refresh-token` when no cookie is sent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsRequest {
    pub full_name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
}

/// Body of a successful login or refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: PublicUser,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

fn with_session_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        secure,
    ))
}

/// Expire both cookies. Removal cookies are added unconditionally because
/// the request may have authenticated with a bearer header instead.
fn without_session_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    let expired = |name: &'static str| {
        let mut cookie = session_cookie(name, String::new(), secure);
        cookie.make_removal();
        cookie
    };
    jar.add(expired(ACCESS_TOKEN_COOKIE))
        .add(expired(REFRESH_TOKEN_COOKIE))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/user/register
///
/// Multipart: `fullName`, `email`, `username`, `password`, `avatar` (image,
/// required), `coverImage` (image, optional).
pub async fn register(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> AppResult<ApiResponse<PublicUser>> {

    let fields = RegisterFields {
        full_name: form.text("fullName").unwrap_or_default().trim().to_string(),
        email: normalize_handle(form.text("email").unwrap_or_default()),
        username: normalize_handle(form.text("username").unwrap_or_default()),
    };
    validate_body(&fields)?;
    let password = form.text("password").unwrap_or_default().to_string();
    validate_password_strength(&password)?;

    if UserRepo::find_by_username_or_email(&state.pool, &fields.username, &fields.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "User with email or username already exists".into(),
        )));
    }

    let avatar_file = form.require_file("avatar")?;
    let cover_file = form.take_file("coverImage");

    let avatar = upload_file(&state, "avatar", &avatar_file, MediaCategory::Image).await?;
    let cover = match cover_file {
        Some(file) => {
            match upload_file(&state, "coverImage", &file, MediaCategory::Image).await {
                Ok(cover) => Some(cover),
                Err(e) => {
                    release_media_best_effort(&state, &avatar.url, MediaCategory::Image).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: fields.username,
        email: fields.email,
        full_name: fields.full_name,
        password_hash,
        avatar_url: avatar.url.clone(),
        cover_image_url: cover.as_ref().map(|c| c.url.clone()),
    };

    let user = match UserRepo::create(&state.pool, &input).await {
        Ok(user) => user,
        Err(e) => {
            // Lost a race on username/email: do not leak the uploads.
            release_media_best_effort(&state, &avatar.url, MediaCategory::Image).await;
            if let Some(cover) = &cover {
                release_media_best_effort(&state, &cover.url, MediaCategory::Image).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(ApiResponse::created(
        PublicUser::from(user),
        "User registered successfully",
    ))
}

/// POST /api/v1/user/login
///
/// Sets `accessToken` / `refreshToken` cookies and returns both tokens.
/// Unknown account and wrong password are indistinguishable (401).
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<SessionData>)> {
    let login = input
        .username
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .or(input.email.as_deref())
        .map(normalize_handle)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("username or email is required".into())))?;

    let user = UserRepo::find_by_login(&state.pool, &login)
        .await?
        .ok_or_else(|| unauthorized("Invalid user credentials"))?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(unauthorized("Invalid user credentials"));
    }

    let tokens = TokenService::new(&state.pool, &state.config.jwt)
        .issue_pair(&user)
        .await?;

    tracing::info!(user_id = user.id, "User logged in");
    let jar = with_session_cookies(jar, &tokens, state.config.cookie_secure);
    Ok((
        jar,
        ApiResponse::ok(
            SessionData {
                user: PublicUser::from(user),
                tokens,
            },
            "User logged in successfully",
        ),
    ))
}

/// POST /api/v1/user/logout
///
/// Revokes the stored refresh token and clears both cookies.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, ApiResponse<serde_json::Value>)> {
    TokenService::new(&state.pool, &state.config.jwt)
        .revoke(auth.user_id)
        .await?;

    tracing::info!(user_id = auth.user_id, "User logged out");
    Ok((
        without_session_cookies(jar, state.config.cookie_secure),
        ApiResponse::ok(serde_json::json!({}), "User logged out"),
    ))
}

/// POST /api/v1/user/refresh-token
///
/// Reads the refresh token from the `refreshToken` cookie, or from the JSON
/// body `{refreshToken}`.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> AppResult<(CookieJar, ApiResponse<SessionData>)> {
    let from_cookie = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|t| !t.is_empty());

    let presented = match from_cookie {
        Some(token) => token,
        None => {
            let request: RefreshRequest = if body.is_empty() {
                RefreshRequest::default()
            } else {
                serde_json::from_slice(&body)
                    .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?
            };
            request
                .refresh_token
                .filter(|t| !t.is_empty())
                .ok_or_else(|| unauthorized("Unauthorized request"))?
        }
    };

    let (user, tokens) = TokenService::new(&state.pool, &state.config.jwt)
        .rotate(&presented)
        .await?;

    let jar = with_session_cookies(jar, &tokens, state.config.cookie_secure);
    Ok((
        jar,
        ApiResponse::ok(
            SessionData {
                user: PublicUser::from(user),
                tokens,
            },
            "Access token refreshed",
        ),
    ))
}

// ---------------------------------------------------------------------------
// Account self-service
// ---------------------------------------------------------------------------

/// POST /api/v1/user/change-password
///
/// Also revokes the stored refresh token, ending other sessions at their
/// next refresh.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    validate_body(&input)?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| unauthorized("Invalid access token"))?;

    let valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::BadRequest("Invalid old password".into()));
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;
    TokenService::new(&state.pool, &state.config.jwt)
        .revoke(user.id)
        .await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// GET /api/v1/user/current-user
pub async fn current_user(auth: AuthUser) -> AppResult<ApiResponse<PublicUser>> {
    Ok(ApiResponse::ok(auth.user, "User fetched successfully"))
}

/// PATCH /api/v1/user/update-details
pub async fn update_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateDetailsRequest>,
) -> AppResult<ApiResponse<PublicUser>> {
    validate_body(&input)?;
    let full_name = optional_text("fullName", input.full_name.as_deref())?;
    if full_name.is_none() && input.email.is_none() {
        return Err(AppError::BadRequest(
            "At least one of fullName or email is required".into(),
        ));
    }

    let update = UpdateAccount {
        full_name: full_name.map(ToOwned::to_owned),
        email: input.email.as_deref().map(normalize_handle),
    };
    let user = UserRepo::update_account(&state.pool, auth.user_id, &update)
        .await?
        .ok_or_else(|| unauthorized("Invalid access token"))?;

    tracing::info!(user_id = user.id, "Account details updated");
    Ok(ApiResponse::ok(
        PublicUser::from(user),
        "Account details updated successfully",
    ))
}

/// PATCH /api/v1/user/update-avatar (multipart `avatar`)
pub async fn update_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: UploadForm,
) -> AppResult<ApiResponse<PublicUser>> {
    let file = form.require_file("avatar")?;
    let uploaded = upload_file(&state, "avatar", &file, MediaCategory::Image).await?;

    let user = UserRepo::update_avatar(&state.pool, auth.user_id, &uploaded.url)
        .await?
        .ok_or_else(|| unauthorized("Invalid access token"))?;
    release_media_best_effort(&state, &auth.user.avatar_url, MediaCategory::Image).await;

    tracing::info!(user_id = user.id, "Avatar updated");
    Ok(ApiResponse::ok(
        PublicUser::from(user),
        "Avatar image updated successfully",
    ))
}

/// PATCH /api/v1/user/update-cover-image (multipart `coverImage`)
pub async fn update_cover_image(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: UploadForm,
) -> AppResult<ApiResponse<PublicUser>> {
    let file = form.require_file("coverImage")?;
    let uploaded = upload_file(&state, "coverImage", &file, MediaCategory::Image).await?;

    let user = UserRepo::update_cover_image(&state.pool, auth.user_id, &uploaded.url)
        .await?
        .ok_or_else(|| unauthorized("Invalid access token"))?;
    if let Some(old) = &auth.user.cover_image_url {
        release_media_best_effort(&state, old, MediaCategory::Image).await;
    }

    tracing::info!(user_id = user.id, "Cover image updated");
    Ok(ApiResponse::ok(
        PublicUser::from(user),
        "Cover image updated successfully",
    ))
}

/// GET /api/v1/user/channel/{username}
pub async fn channel_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ChannelProfile>> {
    let username = normalize_handle(&username);
    let profile = UserRepo::channel_profile(&state.pool, &username, Some(auth.user_id))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByName {
                entity: "Channel",
                name: username.clone(),
            })
        })?;
    Ok(ApiResponse::ok(profile, "User channel fetched successfully"))
}

/// GET /api/v1/user/watch-history
pub async fn watch_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Page<VideoCard>>> {
    let request = params.page_request();
    let (docs, total) = VideoRepo::list_watch_history(&state.pool, auth.user_id, request).await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Watch history fetched successfully",
    ))
}
