//! Route definitions for the `/tweet` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::tweet;
use crate::state::AppState;

/// Routes mounted at `/tweet`.
///
/// ```text
/// POST   /                  -> create_tweet
/// GET    /user/{user_id}    -> user_tweets
/// PATCH  /{id}              -> update_tweet
/// DELETE /{id}              -> delete_tweet
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tweet::create_tweet))
        .route("/user/{user_id}", get(tweet::user_tweets))
        .route("/{id}", patch(tweet::update_tweet).delete(tweet::delete_tweet))
}
