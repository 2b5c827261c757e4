//! Handlers for the `/subscription` resource.

use axum::extract::State;
use vidhub_core::pagination::Page;
use vidhub_core::types::DbId;
use vidhub_db::models::owner::ChannelSummary;
use vidhub_db::models::subscription::{SubscribedChannel, SubscriptionToggle};
use vidhub_db::repositories::{SubscriptionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{Path, Query};
use crate::handlers::not_found;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn ensure_user_exists(state: &AppState, user_id: DbId) -> AppResult<()> {
    match UserRepo::find_by_id(&state.pool, user_id).await? {
        Some(_) => Ok(()),
        None => Err(not_found("Channel", user_id)),
    }
}

/// POST /api/v1/subscription/c/{channelId}
pub async fn toggle_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<DbId>,
) -> AppResult<ApiResponse<SubscriptionToggle>> {
    if channel_id == auth.user_id {
        return Err(AppError::BadRequest(
            "You cannot subscribe to your own channel".into(),
        ));
    }
    ensure_user_exists(&state, channel_id).await?;

    let toggle = SubscriptionRepo::toggle(&state.pool, auth.user_id, channel_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        channel_id,
        is_subscribed = toggle.is_subscribed,
        "Subscription toggled"
    );
    let message = if toggle.is_subscribed {
        "Subscribed"
    } else {
        "Unsubscribed"
    };
    Ok(ApiResponse::ok(toggle, message))
}

/// GET /api/v1/subscription/c/{channelId}
pub async fn channel_subscribers(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Page<ChannelSummary>>> {
    ensure_user_exists(&state, channel_id).await?;

    let request = params.page_request();
    let (docs, total) =
        SubscriptionRepo::list_subscribers(&state.pool, channel_id, Some(auth.user_id), request)
            .await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Subscribers fetched successfully",
    ))
}

/// GET /api/v1/subscription/u/{subscriberId}
pub async fn subscribed_channels(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(subscriber_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Page<SubscribedChannel>>> {
    ensure_user_exists(&state, subscriber_id).await?;

    let request = params.page_request();
    let (docs, total) = SubscriptionRepo::list_subscribed_channels(
        &state.pool,
        subscriber_id,
        Some(auth.user_id),
        request,
    )
    .await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Subscribed channels fetched successfully",
    ))
}
