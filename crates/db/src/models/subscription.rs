//! Subscription toggle result and channel listings.

use serde::Serialize;
use sqlx::FromRow;
use vidhub_core::types::{DbId, Timestamp};

use crate::models::owner::{ChannelSummary, OwnerSummary};
use crate::models::video::VideoBrief;

/// State of a subscription after a toggle.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionToggle {
    pub is_subscribed: bool,
    pub subscribers_count: i64,
}

/// Flat row for a user listed as a channel (subscriber or subscription).
#[derive(Debug, Clone, FromRow)]
pub struct ChannelRow {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
    pub subscribers_count: i64,
    pub is_subscribed: bool,
}

impl From<ChannelRow> for ChannelSummary {
    fn from(row: ChannelRow) -> Self {
        Self {
            owner: OwnerSummary {
                id: row.id,
                username: row.username,
                full_name: row.full_name,
                avatar: row.avatar,
            },
            subscribers_count: row.subscribers_count,
            is_subscribed: row.is_subscribed,
        }
    }
}

/// Flat row for a followed channel with its newest published upload.
#[derive(Debug, Clone, FromRow)]
pub struct SubscribedChannelRow {
    #[sqlx(flatten)]
    pub channel: ChannelRow,
    pub latest_video_id: Option<DbId>,
    pub latest_video_url: Option<String>,
    pub latest_thumbnail_url: Option<String>,
    pub latest_title: Option<String>,
    pub latest_duration: Option<f64>,
    pub latest_views: Option<i64>,
    pub latest_created_at: Option<Timestamp>,
}

/// A channel the user follows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    #[serde(flatten)]
    pub channel: ChannelSummary,
    pub latest_video: Option<VideoBrief>,
}

impl From<SubscribedChannelRow> for SubscribedChannel {
    fn from(row: SubscribedChannelRow) -> Self {
        // The lateral join yields all-NULL columns when the channel has no
        // published video.
        let latest_video = match (
            row.latest_video_id,
            row.latest_video_url,
            row.latest_thumbnail_url,
            row.latest_title,
            row.latest_created_at,
        ) {
            (Some(id), Some(video_file), Some(thumbnail), Some(title), Some(created_at)) => {
                Some(VideoBrief {
                    id,
                    video_file,
                    thumbnail,
                    title,
                    duration: row.latest_duration.unwrap_or_default(),
                    views: row.latest_views.unwrap_or_default(),
                    created_at,
                })
            }
            _ => None,
        };

        Self {
            channel: ChannelSummary::from(row.channel),
            latest_video,
        }
    }
}
