//! Session extractor: resolves the calling user from an access token.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use vidhub_core::types::DbId;
use vidhub_db::models::user::PublicUser;
use vidhub_db::repositories::UserRepo;

use crate::auth::tokens::TokenService;
use crate::error::{unauthorized, AppError};
use crate::state::AppState;

/// Cookie holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie holding the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// The authenticated principal.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication; the handler never runs without a resolved user.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<ApiResponse<()>> {
///     tracing::info!(user_id = auth.user_id, "handling request");
///     Ok(ApiResponse::ok((), "done"))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The user's current record, without credentials.
    pub user: PublicUser,
}

/// Pull the access token from the `accessToken` cookie, falling back to
/// `Authorization: Bearer <token>`. The cookie wins when both are present.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
        })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_access_token(&parts.headers)
            .ok_or_else(|| unauthorized("Unauthorized request"))?;

        let claims = TokenService::new(&state.pool, &state.config.jwt).verify_access(&token)?;

        // The token may outlive its user.
        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("Invalid access token"))?;

        Ok(AuthUser {
            user_id: user.id,
            user: PublicUser::from(user),
        })
    }
}
