//! Playlist entity model, DTOs, and joined views.

use serde::Serialize;
use sqlx::FromRow;
use vidhub_core::ownership::Owned;
use vidhub_core::types::{DbId, Timestamp};

use crate::models::owner::OwnerSummary;
use crate::models::video::VideoCard;

/// A playlist row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Playlist {
    const ENTITY: &'static str = "Playlist";

    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

/// DTO for creating a playlist.
#[derive(Debug, Clone)]
pub struct CreatePlaylist {
    pub owner_id: DbId,
    pub name: String,
    pub description: String,
}

/// DTO for renaming / re-describing a playlist. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A playlist with aggregate counts, as shown in a user's playlist list.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: String,
    pub total_videos: i64,
    pub total_views: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A full playlist page: summary, owner, and ordered videos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub summary: PlaylistSummary,
    pub owner: OwnerSummary,
    pub videos: Vec<VideoCard>,
}
