//! Media reference helpers: mime-category checks and public-id parsing.

use crate::error::CoreError;

/// Top-level mime category an upload must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Video,
}

impl MediaCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Check that `content_type` (e.g. `video/mp4`) falls in `expected`.
///
/// A missing content type is treated as a mismatch.
pub fn ensure_category(
    field: &str,
    content_type: Option<&str>,
    expected: MediaCategory,
) -> Result<(), CoreError> {
    let category = content_type
        .and_then(|ct| ct.split('/').next())
        .map(str::trim)
        .unwrap_or("");

    if category.eq_ignore_ascii_case(expected.as_str()) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedMediaType(format!(
            "Invalid file type for '{field}'. Only {} files are allowed.",
            expected.as_str()
        )))
    }
}

/// Derive the media host's public id from a stored URL.
///
/// The id is the last path segment with its extension removed:
/// `https://host/demo/video/upload/v17/abc123.mp4` gives `abc123`.
/// Returns `None` when the URL has no usable final segment.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query.trim_end_matches('/').rsplit('/').next()?;
    let stem = match segment.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => segment,
    };

    if stem.is_empty() || stem.contains(':') {
        None
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_strips_path_and_extension() {
        assert_eq!(
            public_id_from_url("https://res.example.com/demo/video/upload/v1712/abc123.mp4"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn public_id_ignores_query_string() {
        assert_eq!(
            public_id_from_url("https://res.example.com/img/upload/thumb.v2.png?x=1"),
            Some("thumb.v2".to_string())
        );
    }

    #[test]
    fn public_id_without_extension_is_whole_segment() {
        assert_eq!(
            public_id_from_url("https://res.example.com/raw/upload/plainid"),
            Some("plainid".to_string())
        );
    }

    #[test]
    fn public_id_rejects_empty_urls() {
        assert_eq!(public_id_from_url(""), None);
        assert_eq!(public_id_from_url("https://"), None);
    }

    #[test]
    fn category_matches_mime_prefix() {
        assert!(ensure_category("videoFile", Some("video/mp4"), MediaCategory::Video).is_ok());
        assert!(ensure_category("thumbnail", Some("image/png"), MediaCategory::Image).is_ok());
    }

    #[test]
    fn category_mismatch_is_unsupported_media_type() {
        let err = ensure_category("thumbnail", Some("video/mp4"), MediaCategory::Image).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedMediaType(_)));

        let err = ensure_category("videoFile", None, MediaCategory::Video).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedMediaType(_)));
    }
}
