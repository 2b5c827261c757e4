//! Handlers for the `/video` resource.

use axum::extract::State;
use vidhub_core::media::MediaCategory;
use vidhub_core::pagination::Page;
use vidhub_core::search::build_tsquery;
use vidhub_core::types::DbId;
use vidhub_core::validation::{optional_text, require_text};
use vidhub_db::models::video::{CreateVideo, UpdateVideo, Video, VideoCard, VideoDetail, VideoFilter};
use vidhub_db::repositories::{UserRepo, VideoRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{Path, Query};
use crate::handlers::upload::{release_media_best_effort, upload_file, UploadForm};
use crate::handlers::{authorize_owner, not_found};
use crate::middleware::auth::AuthUser;
use crate::query::VideoListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/video
pub async fn list_videos(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<VideoListParams>,
) -> AppResult<ApiResponse<Page<VideoCard>>> {
    let request = params.page_request();
    let filter = VideoFilter {
        tsquery: params.query.as_deref().and_then(build_tsquery),
        owner_id: params.user_id,
        sort: params.sort()?,
    };

    let (docs, total) =
        VideoRepo::list_published(&state.pool, &filter, Some(auth.user_id), request).await?;
    Ok(ApiResponse::ok(
        Page::new(docs, total, request),
        "Videos fetched successfully",
    ))
}

/// POST /api/v1/video
///
/// Multipart: `videoFile` (video), `thumbnail` (image), `title`,
/// `description`.
pub async fn publish_video(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: UploadForm,
) -> AppResult<ApiResponse<Video>> {
    let title = require_text("title", form.text("title").unwrap_or_default())?.to_string();
    let description =
        require_text("description", form.text("description").unwrap_or_default())?.to_string();
    let video_file = form.require_file("videoFile")?;
    let thumbnail_file = form.require_file("thumbnail")?;

    let video_media = upload_file(&state, "videoFile", &video_file, MediaCategory::Video).await?;
    let thumbnail =
        match upload_file(&state, "thumbnail", &thumbnail_file, MediaCategory::Image).await {
            Ok(thumbnail) => thumbnail,
            Err(e) => {
                release_media_best_effort(&state, &video_media.url, MediaCategory::Video).await;
                return Err(e);
            }
        };

    let input = CreateVideo {
        owner_id: auth.user_id,
        video_url: video_media.url.clone(),
        thumbnail_url: thumbnail.url.clone(),
        title,
        description,
        duration: video_media.duration.unwrap_or(0.0),
    };

    let video = match VideoRepo::create(&state.pool, &input).await {
        Ok(video) => video,
        Err(e) => {
            release_media_best_effort(&state, &video_media.url, MediaCategory::Video).await;
            release_media_best_effort(&state, &thumbnail.url, MediaCategory::Image).await;
            return Err(e.into());
        }
    };

    tracing::info!(video_id = video.id, user_id = auth.user_id, "Video published");
    Ok(ApiResponse::created(video, "Video uploaded successfully"))
}

/// GET /api/v1/video/{id}
///
/// Counts a view and records the video in the viewer's watch history.
pub async fn get_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<VideoDetail>> {
    let mut detail = VideoRepo::detail(&state.pool, id, Some(auth.user_id))
        .await?
        .ok_or_else(|| not_found("Video", id))?;

    VideoRepo::increment_views(&state.pool, id).await?;
    UserRepo::record_watch(&state.pool, auth.user_id, id).await?;
    detail.views += 1;

    Ok(ApiResponse::ok(detail, "Video fetched successfully"))
}

/// PATCH /api/v1/video/{id}
///
/// Multipart: `title?`, `description?`, `thumbnail?` (image).
pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    mut form: UploadForm,
) -> AppResult<ApiResponse<Video>> {
    let existing = authorize_owner(
        VideoRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "update",
    )?;

    let title = optional_text("title", form.text("title"))?.map(ToOwned::to_owned);
    let description =
        optional_text("description", form.text("description"))?.map(ToOwned::to_owned);
    let thumbnail_file = form.take_file("thumbnail");

    if title.is_none() && description.is_none() && thumbnail_file.is_none() {
        return Err(AppError::BadRequest(
            "At least one of title, description or thumbnail is required".into(),
        ));
    }

    let thumbnail = match &thumbnail_file {
        Some(file) => Some(upload_file(&state, "thumbnail", file, MediaCategory::Image).await?),
        None => None,
    };

    let update = UpdateVideo {
        title,
        description,
        thumbnail_url: thumbnail.as_ref().map(|t| t.url.clone()),
    };
    let updated = match VideoRepo::update(&state.pool, id, &update).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(thumbnail) = &thumbnail {
                release_media_best_effort(&state, &thumbnail.url, MediaCategory::Image).await;
            }
            return Err(e.into());
        }
    };
    let Some(video) = updated else {
        // Deleted between the ownership check and the update.
        if let Some(thumbnail) = &thumbnail {
            release_media_best_effort(&state, &thumbnail.url, MediaCategory::Image).await;
        }
        return Err(not_found("Video", id));
    };

    if thumbnail.is_some() {
        release_media_best_effort(&state, &existing.thumbnail_url, MediaCategory::Image).await;
    }

    tracing::info!(video_id = id, user_id = auth.user_id, "Video updated");
    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

/// DELETE /api/v1/video/{id}
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let video = authorize_owner(
        VideoRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "delete",
    )?;

    if !VideoRepo::delete(&state.pool, id).await? {
        return Err(not_found("Video", id));
    }

    // The row is gone; a media host failure now only leaves an orphaned asset.
    release_media_best_effort(&state, &video.video_url, MediaCategory::Video).await;
    release_media_best_effort(&state, &video.thumbnail_url, MediaCategory::Image).await;

    tracing::info!(video_id = id, user_id = auth.user_id, "Video deleted");
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Video deleted successfully",
    ))
}

/// PATCH /api/v1/video/{id}/publish
pub async fn toggle_publish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Video>> {
    authorize_owner(
        VideoRepo::find_by_id(&state.pool, id).await?,
        id,
        &auth,
        "publish",
    )?;

    let video = VideoRepo::toggle_published(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Video", id))?;

    tracing::info!(
        video_id = id,
        is_published = video.is_published,
        "Video publish status toggled"
    );
    Ok(ApiResponse::ok(
        video,
        "Video publish status toggled successfully",
    ))
}
