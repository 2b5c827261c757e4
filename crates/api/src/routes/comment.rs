//! Route definitions for the `/comment` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes mounted at `/comment`.
///
/// The path id is a video id for GET/POST and a comment id for
/// PATCH/DELETE.
///
/// ```text
/// GET    /{id}   -> list_comments
/// POST   /{id}   -> add_comment
/// PATCH  /{id}   -> update_comment
/// DELETE /{id}   -> delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(comment::list_comments)
            .post(comment::add_comment)
            .patch(comment::update_comment)
            .delete(comment::delete_comment),
    )
}
