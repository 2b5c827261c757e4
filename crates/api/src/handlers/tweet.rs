//! Handlers for the `/tweet` resource.

use axum::extract::State;
use serde::Deserialize;
use vidhub_core::pagination::Page;
use vidhub_core::types::DbId;
use vidhub_core::validation::require_text;
use vidhub_db::models::tweet::{CreateTweet, Tweet, TweetView};
use vidhub_db::repositories::{TweetRepo, UserRepo};

use crate::error::AppResult;
use crate::extract::{Json, Path, Query};
use crate::handlers::{authorize_owner, not_found};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TweetRequest {
    #[serde(default)]
    pub content: String,
}

/// POST /api/v1/tweet
pub async fn create_tweet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<TweetRequest>,
) -> AppResult<ApiResponse<Tweet>> {
    let content = require_text("content", &input.content)?;
    let tweet = TweetRepo::create(
        &state.pool,
        &CreateTweet {
            owner_id: auth.user_id,
            content: content.to_string(),
        },
    )
    .await?;

    tracing::info!(tweet_id = tweet.id, user_id = auth.user_id, "Tweet created");
    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// GET /api/v1/tweet/user/{userId}
pub async fn user_tweets(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Page<TweetView>>> {
    if UserRepo::find_by_id(&state.pool, user_id).await?.is_none() {
        return Err(not_found("User", user_id));
    }

    let request = params.page_request();
    let (docs, total) =
        TweetRepo::list_for_owner(&state.pool, user_id, Some(auth.user_id), request).await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Tweets fetched successfully",
    ))
}

/// PATCH /api/v1/tweet/{id}
pub async fn update_tweet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TweetRequest>,
) -> AppResult<ApiResponse<Tweet>> {
    let content = require_text("content", &input.content)?;
    authorize_owner(
        TweetRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "update",
    )?;

    let tweet = TweetRepo::update_content(&state.pool, id, content)
        .await?
        .ok_or_else(|| not_found("Tweet", id))?;

    tracing::info!(tweet_id = id, user_id = auth.user_id, "Tweet updated");
    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

/// DELETE /api/v1/tweet/{id}
pub async fn delete_tweet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    authorize_owner(
        TweetRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "delete",
    )?;

    if !TweetRepo::delete(&state.pool, id).await? {
        return Err(not_found("Tweet", id));
    }

    tracing::info!(tweet_id = id, user_id = auth.user_id, "Tweet deleted");
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Tweet deleted successfully",
    ))
}
