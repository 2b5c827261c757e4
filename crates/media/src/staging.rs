//! Local staging of uploaded bytes before they are sent to the media host.
//!
//! A [`StagedUpload`] owns its temp file and removes it on drop, so the file
//! is gone whether the remote upload succeeds, fails, or the request is
//! cancelled mid-flight.

use std::path::{Path, PathBuf};

use crate::error::MediaError;

/// Longest file extension carried over from the client's file name.
const MAX_EXTENSION_LEN: usize = 8;

/// A file written to the upload temp directory.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    /// Write `bytes` to a fresh uniquely-named file under `dir`.
    ///
    /// The client's `file_name` only contributes its extension, and only if
    /// it is short and alphanumeric.
    pub async fn write(
        dir: &Path,
        file_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<Self, MediaError> {
        tokio::fs::create_dir_all(dir).await?;

        let mut name = uuid::Uuid::new_v4().to_string();
        if let Some(ext) = file_name.and_then(safe_extension) {
            name.push('.');
            name.push_str(&ext);
        }

        let path = dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Staged upload");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload");
            }
        }
    }
}

fn safe_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
