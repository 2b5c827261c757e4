//! Route definitions for the `/playlist` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::playlist;
use crate::state::AppState;

/// Routes mounted at `/playlist`.
///
/// ```text
/// POST   /                  -> create_playlist
/// GET    /user/{user_id}    -> user_playlists
/// GET    /{id}              -> get_playlist
/// PATCH  /{id}              -> update_playlist
/// DELETE /{id}              -> delete_playlist
/// POST   /{id}/videos       -> add_video
/// DELETE /{id}/videos       -> remove_video
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(playlist::create_playlist))
        .route("/user/{user_id}", get(playlist::user_playlists))
        .route(
            "/{id}",
            get(playlist::get_playlist)
                .patch(playlist::update_playlist)
                .delete(playlist::delete_playlist),
        )
        .route(
            "/{id}/videos",
            post(playlist::add_video).delete(playlist::remove_video),
        )
}
