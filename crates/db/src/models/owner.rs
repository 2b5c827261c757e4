//! Embedded user summaries shown next to owned content.

use serde::Serialize;
use vidhub_core::types::DbId;

/// The owner of a video, comment, tweet, or playlist as shown in listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

/// An owner summary plus channel-level relationship fields.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    #[serde(flatten)]
    pub owner: OwnerSummary,
    pub subscribers_count: i64,
    pub is_subscribed: bool,
}
