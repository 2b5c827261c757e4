//! Video entity model, DTOs, and joined views.

use serde::Serialize;
use sqlx::FromRow;
use vidhub_core::ownership::Owned;
use vidhub_core::pagination::VideoSort;
use vidhub_core::types::{DbId, Timestamp};

use crate::models::owner::{ChannelSummary, OwnerSummary};

/// A video row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: DbId,
    pub owner_id: DbId,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    /// Seconds, as reported by the media host.
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Video {
    const ENTITY: &'static str = "Video";

    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

/// DTO for inserting a freshly uploaded video.
#[derive(Debug, Clone)]
pub struct CreateVideo {
    pub owner_id: DbId,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
}

/// DTO for the owner's metadata edit. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Filters for the public video listing.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    /// Already-sanitized tsquery (see `vidhub_core::search::build_tsquery`).
    pub tsquery: Option<String>,
    pub owner_id: Option<DbId>,
    pub sort: VideoSort,
}

/// Flat row produced by the video card query; see [`VideoCard`].
#[derive(Debug, Clone, FromRow)]
pub struct VideoCardRow {
    pub id: DbId,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub owner_id: DbId,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: String,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// A video in a list, with its owner and per-viewer like fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCard {
    pub id: DbId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub owner: OwnerSummary,
    pub likes_count: i64,
    pub is_liked: bool,
}

impl From<VideoCardRow> for VideoCard {
    fn from(row: VideoCardRow) -> Self {
        Self {
            id: row.id,
            video_file: row.video_url,
            thumbnail: row.thumbnail_url,
            title: row.title,
            description: row.description,
            duration: row.duration,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
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

/// Flat row produced by the video detail query; see [`VideoDetail`].
#[derive(Debug, Clone, FromRow)]
pub struct VideoDetailRow {
    #[sqlx(flatten)]
    pub card: VideoCardRow,
    pub owner_subscribers_count: i64,
    pub owner_is_subscribed: bool,
}

/// A single video page: the card fields plus the owner's channel fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub id: DbId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub owner: ChannelSummary,
    pub likes_count: i64,
    pub is_liked: bool,
}

impl From<VideoDetailRow> for VideoDetail {
    fn from(row: VideoDetailRow) -> Self {
        let card = VideoCard::from(row.card);
        Self {
            id: card.id,
            video_file: card.video_file,
            thumbnail: card.thumbnail,
            title: card.title,
            description: card.description,
            duration: card.duration,
            views: card.views,
            is_published: card.is_published,
            created_at: card.created_at,
            owner: ChannelSummary {
                owner: card.owner,
                subscribers_count: row.owner_subscribers_count,
                is_subscribed: row.owner_is_subscribed,
            },
            likes_count: card.likes_count,
            is_liked: card.is_liked,
        }
    }
}

/// Compact video shown as a channel's latest upload.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoBrief {
    pub id: DbId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub duration: f64,
    pub views: i64,
    pub created_at: Timestamp,
}
