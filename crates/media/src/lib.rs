//! Remote media hosting: upload staged files and destroy them by public id.
//!
//! Handlers depend on the [`MediaHost`] trait only; [`cloudinary::CloudinaryHost`]
//! is the production implementation and tests substitute an in-memory one.

use std::path::Path;

use async_trait::async_trait;
use vidhub_core::media::MediaCategory;

pub mod cloudinary;
pub mod error;
pub mod staging;

pub use cloudinary::{CloudinaryHost, MediaConfig};
pub use error::MediaError;
pub use staging::StagedUpload;

/// A file accepted by the media host.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedia {
    /// Public HTTPS URL of the stored file.
    pub url: String,
    /// Host-side identifier used to destroy the file later.
    pub public_id: String,
    /// Playback length in seconds, reported for videos only.
    pub duration: Option<f64>,
}

/// A remote store for user-uploaded images and videos.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload the file at `path`, letting the host detect its resource type.
    async fn upload(&self, path: &Path) -> Result<UploadedMedia, MediaError>;

    /// Remove a previously uploaded file.
    async fn destroy(&self, public_id: &str, category: MediaCategory) -> Result<(), MediaError>;
}
