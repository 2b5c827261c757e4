//! Handlers for the `/like` resource.

use axum::extract::State;
use vidhub_core::like_target::{LikeKind, LikeTarget};
use vidhub_core::pagination::Page;
use vidhub_core::types::DbId;
use vidhub_db::models::like::LikeToggle;
use vidhub_db::models::video::VideoCard;
use vidhub_db::repositories::{CommentRepo, LikeRepo, TweetRepo, VideoRepo};

use crate::error::AppResult;
use crate::extract::{Path, Query};
use crate::handlers::{not_found, video_visible_to};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Fail `NotFound` unless the like target exists and `viewer` may see it.
async fn ensure_target_exists(
    state: &AppState,
    target: LikeTarget,
    viewer: DbId,
) -> AppResult<()> {
    let id = target.id();
    let visible = match target {
        LikeTarget::Video(_) => video_visible_to(state, id, viewer).await?,
        // A comment is hidden along with its video.
        LikeTarget::Comment(_) => match CommentRepo::find_by_id(&state.pool, id).await? {
            Some(comment) => video_visible_to(state, comment.video_id, viewer).await?,
            None => false,
        },
        LikeTarget::Tweet(_) => TweetRepo::find_by_id(&state.pool, id).await?.is_some(),
    };

    if visible {
        Ok(())
    } else {
        Err(not_found(target.kind().entity(), id))
    }
}

/// POST /api/v1/like/toggle/{kind}/{id}
///
/// `kind` is `v`, `c` or `t`. Returns the state after the toggle.
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id)): Path<(String, DbId)>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let target = LikeKind::from_route_segment(&kind)?.target(id);
    ensure_target_exists(&state, target, auth.user_id).await?;

    let toggle = LikeRepo::toggle(&state.pool, auth.user_id, target).await?;

    tracing::info!(
        user_id = auth.user_id,
        kind = ?target.kind(),
        target_id = id,
        is_liked = toggle.is_liked,
        "Like toggled"
    );
    let message = if toggle.is_liked { "Liked" } else { "Unliked" };
    Ok(ApiResponse::ok(toggle, message))
}

/// GET /api/v1/like
pub async fn liked_videos(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Page<VideoCard>>> {
    let request = params.page_request();
    let (docs, total) = VideoRepo::list_liked_by(&state.pool, auth.user_id, request).await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Liked videos fetched successfully",
    ))
}
