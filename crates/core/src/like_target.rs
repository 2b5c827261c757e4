//! The thing a like points at.
//!
//! A like row references exactly one of a video, a comment, or a tweet. Code
//! outside the repository layer never sees three nullable columns, only a
//! [`LikeTarget`], so "exactly one target" holds by construction.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Which kind of entity a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeKind {
    Video,
    Comment,
    Tweet,
}

impl LikeKind {
    /// Parse the short route segment used by the toggle endpoints
    /// (`v`, `c`, `t`).
    pub fn from_route_segment(segment: &str) -> Result<Self, CoreError> {
        match segment {
            "v" => Ok(Self::Video),
            "c" => Ok(Self::Comment),
            "t" => Ok(Self::Tweet),
            other => Err(CoreError::Validation(format!(
                "Unknown like target '{other}'. Must be one of: v, c, t"
            ))),
        }
    }

    /// Column on the `likes` table holding this kind of target.
    pub fn column(self) -> &'static str {
        match self {
            Self::Video => "video_id",
            Self::Comment => "comment_id",
            Self::Tweet => "tweet_id",
        }
    }

    /// Human-readable entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Comment => "Comment",
            Self::Tweet => "Tweet",
        }
    }

    pub fn target(self, id: DbId) -> LikeTarget {
        match self {
            Self::Video => LikeTarget::Video(id),
            Self::Comment => LikeTarget::Comment(id),
            Self::Tweet => LikeTarget::Tweet(id),
        }
    }
}

/// A single like target: the kind plus the referenced id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Video(DbId),
    Comment(DbId),
    Tweet(DbId),
}

impl LikeTarget {
    pub fn kind(self) -> LikeKind {
        match self {
            Self::Video(_) => LikeKind::Video,
            Self::Comment(_) => LikeKind::Comment,
            Self::Tweet(_) => LikeKind::Tweet,
        }
    }

    pub fn id(self) -> DbId {
        match self {
            Self::Video(id) | Self::Comment(id) | Self::Tweet(id) => id,
        }
    }

    /// Rebuild a target from the three nullable columns of a `likes` row.
    ///
    /// Returns `None` unless exactly one column is populated.
    pub fn from_columns(
        video_id: Option<DbId>,
        comment_id: Option<DbId>,
        tweet_id: Option<DbId>,
    ) -> Option<Self> {
        match (video_id, comment_id, tweet_id) {
            (Some(id), None, None) => Some(Self::Video(id)),
            (None, Some(id), None) => Some(Self::Comment(id)),
            (None, None, Some(id)) => Some(Self::Tweet(id)),
            _ => None,
        }
    }
}
