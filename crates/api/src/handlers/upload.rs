//! Multipart form collection and the media-host round trip.
//!
//! Forms are read fully into memory, files are staged to
//! `UPLOAD_TEMP_DIR`, sent to the media host, and the staged copy is removed
//! whether the upload succeeded or not.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use vidhub_core::media::{ensure_category, public_id_from_url, MediaCategory};
use vidhub_media::{StagedUpload, UploadedMedia};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A file part of a multipart form.
#[derive(Debug)]
pub struct FormFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The text and file parts of a multipart form, keyed by field name.
///
/// Used as the last extractor of an upload handler; a body that is not
/// `multipart/form-data` is rejected as a `BadRequest`.
#[derive(Debug, Default)]
pub struct UploadForm {
    texts: HashMap<String, String>,
    files: HashMap<String, FormFile>,
}

impl<S: Send + Sync> FromRequest<S> for UploadForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Self::read(multipart).await
    }
}

impl UploadForm {
    /// Drain `multipart`. Parts with a file name are files; the rest are text.
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if field.file_name().is_some() {
                let file_name = field.file_name().map(ToOwned::to_owned);
                let content_type = field.content_type().map(ToOwned::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part for an untouched file input.
                if !bytes.is_empty() {
                    form.files.insert(
                        name,
                        FormFile {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.texts.insert(name, text);
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<FormFile> {
        self.files.remove(name)
    }

    /// Like [`Self::take_file`] but a missing file is a `BadRequest`.
    pub fn require_file(&mut self, name: &str) -> AppResult<FormFile> {
        self.take_file(name)
            .ok_or_else(|| AppError::BadRequest(format!("{name} file is required")))
    }
}

/// Check `file`'s mime category, stage it, and upload it.
pub async fn upload_file(
    state: &AppState,
    field: &str,
    file: &FormFile,
    category: MediaCategory,
) -> AppResult<UploadedMedia> {
    ensure_category(field, file.content_type.as_deref(), category)?;

    let staged = StagedUpload::write(
        &state.config.upload_temp_dir,
        file.file_name.as_deref(),
        &file.bytes,
    )
    .await?;
    let uploaded = state.media.upload(staged.path()).await?;
    drop(staged);

    Ok(uploaded)
}

/// Destroy the media behind a stored URL.
pub async fn release_media(state: &AppState, url: &str, category: MediaCategory) -> AppResult<()> {
    match public_id_from_url(url) {
        Some(public_id) => {
            state.media.destroy(&public_id, category).await?;
            Ok(())
        }
        None => {
            tracing::warn!(url, "Stored media URL has no public id; nothing to release");
            Ok(())
        }
    }
}

/// [`release_media`] for cleanups that must not fail the request.
pub async fn release_media_best_effort(state: &AppState, url: &str, category: MediaCategory) {
    if let Err(e) = release_media(state, url, category).await {
        tracing::warn!(url, error = %e, "Failed to release media");
    }
}
