//! Route definitions for the `/subscription` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::subscription;
use crate::state::AppState;

/// Routes mounted at `/subscription`.
///
/// ```text
/// POST /c/{channel_id}      -> toggle_subscription
/// GET  /c/{channel_id}      -> channel_subscribers
/// GET  /u/{subscriber_id}   -> subscribed_channels
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/c/{channel_id}",
            get(subscription::channel_subscribers).post(subscription::toggle_subscription),
        )
        .route("/u/{subscriber_id}", get(subscription::subscribed_channels))
}
