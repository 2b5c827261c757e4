//! Like toggle result.

use serde::Serialize;

/// State of a like after a toggle.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub is_liked: bool,
    pub likes_count: i64,
}
