//! Input normalisation for user-supplied text.

use crate::error::CoreError;

/// Case-fold and trim a username or email so uniqueness is case-insensitive.
pub fn normalize_handle(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Return the trimmed value, or a `Validation` error naming `field` when it
/// is blank.
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed)
    }
}

/// Like [`require_text`] but for optional fields: `None` passes through,
/// `Some("")` is rejected.
pub fn optional_text<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>, CoreError> {
    value.map(|v| require_text(field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_case_folded() {
        assert_eq!(normalize_handle("  Alice@X.com "), "alice@x.com");
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = require_text("content", "   ").unwrap_err();
        match err {
            CoreError::Validation(msg) => assert_eq!(msg, "content is required"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(require_text("content", " hi ").unwrap(), "hi");
    }

    #[test]
    fn optional_text_passes_none() {
        assert_eq!(optional_text("title", None).unwrap(), None);
        assert!(optional_text("title", Some("")).is_err());
    }
}
