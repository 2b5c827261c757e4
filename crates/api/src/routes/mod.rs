pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route except `/user/register`, `/user/login` and
/// `/user/refresh-token` requires a session (the handlers take
/// [`crate::middleware::auth::AuthUser`]).
///
/// ```text
/// /user/...                      accounts and sessions
/// /video, /video/{id}            videos
/// /like/...                      like toggles, liked videos
/// /comment/{id}                  comments
/// /tweet/...                     tweets
/// /playlist/...                  playlists
/// /subscription/...              channel subscriptions
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user::router())
        .nest("/video", video::router())
        .nest("/like", like::router())
        .nest("/comment", comment::router())
        .nest("/tweet", tweet::router())
        .nest("/playlist", playlist::router())
        .nest("/subscription", subscription::router())
}
