//! Comment entity model, DTOs, and joined view.

use serde::Serialize;
use sqlx::FromRow;
use vidhub_core::ownership::Owned;
use vidhub_core::types::{DbId, Timestamp};

use crate::models::owner::OwnerSummary;

/// A comment row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DbId,
    pub video_id: DbId,
    pub owner_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Comment {
    const ENTITY: &'static str = "Comment";

    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

/// DTO for posting a comment on a video.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub video_id: DbId,
    pub owner_id: DbId,
    pub content: String,
}

/// Flat row produced by the comment listing query.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: DbId,
    pub video_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub owner_id: DbId,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: String,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// A comment in a video's thread.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: DbId,
    pub video_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub owner: OwnerSummary,
    pub likes_count: i64,
    pub is_liked: bool,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            video_id: row.video_id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            owner: OwnerSummary {
                id: row.owner_id,
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar: row.owner_avatar,
            },
            likes_count: row.likes_count,
            is_liked: row.is_liked,
        }
    }
}
