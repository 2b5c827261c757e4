//! Tweet entity model and joined view.

use serde::Serialize;
use sqlx::FromRow;
use vidhub_core::ownership::Owned;
use vidhub_core::types::{DbId, Timestamp};

use crate::models::owner::OwnerSummary;

/// A tweet row from the `tweets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: DbId,
    pub owner_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Tweet {
    const ENTITY: &'static str = "Tweet";

    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

/// DTO for posting a tweet.
#[derive(Debug, Clone)]
pub struct CreateTweet {
    pub owner_id: DbId,
    pub content: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TweetRow {
    pub id: DbId,
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

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub owner: OwnerSummary,
    pub likes_count: i64,
    pub is_liked: bool,
}

impl From<TweetRow> for TweetView {
    fn from(row: TweetRow) -> Self {
        Self {
            id: row.id,
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
