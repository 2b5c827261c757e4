//! Handlers for the `/comment` resource.

use axum::extract::State;
use serde::Deserialize;
use vidhub_core::pagination::Page;
use vidhub_core::types::DbId;
use vidhub_core::validation::require_text;
use vidhub_db::models::comment::{Comment, CommentView, CreateComment};
use vidhub_db::repositories::CommentRepo;

use crate::error::AppResult;
use crate::extract::{Json, Path, Query};
use crate::handlers::{authorize_owner, not_found, visible_video};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

/// GET /api/v1/comment/{videoId}
pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Page<CommentView>>> {
    visible_video(&state, video_id, auth.user_id).await?;

    let request = params.page_request();
    let (docs, total) =
        CommentRepo::list_for_video(&state.pool, video_id, Some(auth.user_id), request).await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Comments fetched successfully",
    ))
}

/// POST /api/v1/comment/{videoId}
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<ApiResponse<Comment>> {
    let content = require_text("content", &input.content)?;
    visible_video(&state, video_id, auth.user_id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            video_id,
            owner_id: auth.user_id,
            content: content.to_string(),
        },
    )
    .await?;

    tracing::info!(comment_id = comment.id, video_id, user_id = auth.user_id, "Comment added");
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

/// PATCH /api/v1/comment/{commentId}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<ApiResponse<Comment>> {
    let content = require_text("content", &input.content)?;
    authorize_owner(
        CommentRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "update",
    )?;

    let comment = CommentRepo::update_content(&state.pool, id, content)
        .await?
        .ok_or_else(|| not_found("Comment", id))?;

    tracing::info!(comment_id = id, user_id = auth.user_id, "Comment updated");
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

/// DELETE /api/v1/comment/{commentId}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    authorize_owner(
        CommentRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "delete",
    )?;

    if !CommentRepo::delete(&state.pool, id).await? {
        return Err(not_found("Comment", id));
    }

    tracing::info!(comment_id = id, user_id = auth.user_id, "Comment deleted");
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Comment deleted successfully",
    ))
}
