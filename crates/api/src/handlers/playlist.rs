//! Handlers for the `/playlist` resource.

use axum::extract::State;
use serde::Deserialize;
use vidhub_core::pagination::Page;
use vidhub_core::types::DbId;
use vidhub_core::validation::{optional_text, require_text};
use vidhub_db::models::playlist::{
    CreatePlaylist, Playlist, PlaylistDetail, PlaylistSummary, UpdatePlaylist,
};
use vidhub_db::repositories::{PlaylistRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::{authorize_owner, not_found, visible_video};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideoRequest {
    pub video_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/playlist
pub async fn create_playlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePlaylistRequest>,
) -> AppResult<ApiResponse<Playlist>> {
    let name = require_text("name", &input.name)?;
    let playlist = PlaylistRepo::create(
        &state.pool,
        &CreatePlaylist {
            owner_id: auth.user_id,
            name: name.to_string(),
            description: input.description.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(playlist_id = playlist.id, user_id = auth.user_id, "Playlist created");
    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// GET /api/v1/playlist/{id}
pub async fn get_playlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let summary = PlaylistRepo::summary(&state.pool, id, Some(auth.user_id))
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;
    let owner = UserRepo::find_by_id(&state.pool, summary.owner_id)
        .await?
        .ok_or_else(|| not_found("User", summary.owner_id))?
        .summary();
    let videos = PlaylistRepo::videos(&state.pool, id, Some(auth.user_id)).await?;

    Ok(ApiResponse::ok(
        PlaylistDetail {
            summary,
            owner,
            videos,
        },
        "Playlist fetched successfully",
    ))
}

/// PATCH /api/v1/playlist/{id}
pub async fn update_playlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlaylistRequest>,
) -> AppResult<ApiResponse<Playlist>> {
    let name = optional_text("name", input.name.as_deref())?;
    if name.is_none() && input.description.is_none() {
        return Err(AppError::BadRequest(
            "At least one of name or description is required".into(),
        ));
    }
    authorize_owner(
        PlaylistRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "update",
    )?;

    let update = UpdatePlaylist {
        name: name.map(ToOwned::to_owned),
        description: input.description.as_deref().map(|d| d.trim().to_string()),
    };
    let playlist = PlaylistRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;

    tracing::info!(playlist_id = id, user_id = auth.user_id, "Playlist updated");
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

/// DELETE /api/v1/playlist/{id}
pub async fn delete_playlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    authorize_owner(
        PlaylistRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "delete",
    )?;

    if !PlaylistRepo::delete(&state.pool, id).await? {
        return Err(not_found("Playlist", id));
    }

    tracing::info!(playlist_id = id, user_id = auth.user_id, "Playlist deleted");
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Playlist deleted successfully",
    ))
}

/// POST /api/v1/playlist/{id}/videos
///
/// Adding a video that is already in the playlist is a no-op.
pub async fn add_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<PlaylistVideoRequest>,
) -> AppResult<ApiResponse<PlaylistSummary>> {
    authorize_owner(
        PlaylistRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "modify",
    )?;
    visible_video(&state, input.video_id, auth.user_id).await?;

    let added = PlaylistRepo::add_video(&state.pool, id, input.video_id).await?;
    tracing::info!(playlist_id = id, video_id = input.video_id, added, "Playlist video added");

    let summary = PlaylistRepo::summary(&state.pool, id, Some(auth.user_id))
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;
    let message = if added {
        "Video added to playlist"
    } else {
        "Video already in playlist"
    };
    Ok(ApiResponse::ok(summary, message))
}

/// DELETE /api/v1/playlist/{id}/videos
pub async fn remove_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<PlaylistVideoRequest>,
) -> AppResult<ApiResponse<PlaylistSummary>> {
    authorize_owner(
        PlaylistRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "modify",
    )?;

    if !PlaylistRepo::remove_video(&state.pool, id, input.video_id).await? {
        return Err(not_found("Video", input.video_id));
    }
    tracing::info!(playlist_id = id, video_id = input.video_id, "Playlist video removed");

    let summary = PlaylistRepo::summary(&state.pool, id, Some(auth.user_id))
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;
    Ok(ApiResponse::ok(summary, "Video removed from playlist"))
}

/// GET /api/v1/playlist/user/{userId}
pub async fn user_playlists(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Page<PlaylistSummary>>> {
    if UserRepo::find_by_id(&state.pool, user_id).await?.is_none() {
        return Err(not_found("User", user_id));
    }

    let request = params.page_request();
    let (docs, total) =
        PlaylistRepo::list_for_owner(&state.pool, user_id, Some(auth.user_id), request).await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Playlists fetched successfully",
    ))
}
