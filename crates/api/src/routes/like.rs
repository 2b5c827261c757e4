//! Route definitions for the `/like` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::like;
use crate::state::AppState;

/// Routes mounted at `/like`.
///
/// ```text
/// GET  /                     -> liked_videos
/// POST /toggle/{kind}/{id}   -> toggle_like (kind: v | c | t)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(like::liked_videos))
        .route("/toggle/{kind}/{id}", post(like::toggle_like))
}
