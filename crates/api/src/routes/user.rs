//! Route definitions for the `/user` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST  /register            -> register (public, multipart)
/// POST  /login               -> login (public)
/// POST  /refresh-token       -> refresh_token (public)
/// POST  /logout              -> logout
/// POST  /change-password     -> change_password
/// GET   /current-user        -> current_user
/// PATCH /update-details      -> update_details
/// PATCH /update-avatar       -> update_avatar (multipart)
/// PATCH /update-cover-image  -> update_cover_image (multipart)
/// GET   /channel/{username}  -> channel_profile
/// GET   /watch-history       -> watch_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/refresh-token", post(user::refresh_token))
        .route("/logout", post(user::logout))
        .route("/change-password", post(user::change_password))
        .route("/current-user", get(user::current_user))
        .route("/update-details", patch(user::update_details))
        .route("/update-avatar", patch(user::update_avatar))
        .route("/update-cover-image", patch(user::update_cover_image))
        .route("/channel/{username}", get(user::channel_profile))
        .route("/watch-history", get(user::watch_history))
}
