//! Request handlers, one module per resource.

use validator::Validate;
use vidhub_core::error::CoreError;
use vidhub_core::ownership::{ensure_owner, Owned};
use vidhub_core::types::DbId;
use vidhub_db::repositories::VideoRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub mod comment;
pub mod health;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod upload;
pub mod user;
pub mod video;

/// Resolve a looked-up owned entity for a mutation by `auth`.
///
/// Fails `NotFound` when the lookup came back empty and `Forbidden` when the
/// principal is not the owner. Every owner-only handler goes through here.
pub(crate) fn authorize_owner<T: Owned>(
    found: Option<T>,
    id: DbId,
    auth: &AuthUser,
    action: &str,
) -> AppResult<T> {
    let entity = found.ok_or(AppError::Core(CoreError::NotFound {
        entity: T::ENTITY,
        id,
    }))?;
    ensure_owner(&entity, auth.user_id, action)?;
    Ok(entity)
}

/// Run `validator` rules on a request body, reporting the first message.
pub(crate) fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid request body".to_string());
        AppError::Core(CoreError::Validation(message))
    })
}

/// `NotFound` for a missing row of `entity`.
pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Whether `viewer` may see video `video_id`: it exists and is either
/// published or their own.
pub(crate) async fn video_visible_to(
    state: &AppState,
    video_id: DbId,
    viewer: DbId,
) -> AppResult<bool> {
    Ok(VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .is_some_and(|v| v.is_published || v.owner_id == viewer))
}

/// A video the viewer may see, or `NotFound`.
pub(crate) async fn visible_video(state: &AppState, video_id: DbId, viewer: DbId) -> AppResult<()> {
    if video_visible_to(state, video_id, viewer).await? {
        Ok(())
    } else {
        Err(not_found("Video", video_id))
    }
}
