//! Repository for the `subscriptions` table.

use sqlx::PgPool;
use vidhub_core::pagination::PageRequest;
use vidhub_core::types::DbId;

use crate::aggregate;
use crate::models::owner::ChannelSummary;
use crate::models::subscription::{
    ChannelRow, SubscribedChannel, SubscribedChannelRow, SubscriptionToggle,
};

/// Channel columns for a joined `users u`, with the viewer bound at
/// `$viewer_param`.
fn channel_columns(viewer_param: usize) -> String {
    format!(
        "u.id, u.username, u.full_name, u.avatar_url AS avatar,
         {subscribers} AS subscribers_count,
         {subscribed} AS is_subscribed",
        subscribers = aggregate::subscriber_count("u.id"),
        subscribed = aggregate::subscribed_by_viewer("u.id", viewer_param),
    )
}

/// Provides the subscription toggle and channel listings.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Subscribe `subscriber_id` to `channel_id`, or unsubscribe if already
    /// subscribed. Same single-statement shape as the like toggle, including
    /// the re-count after a lost insert race.
    pub async fn toggle(
        pool: &PgPool,
        subscriber_id: DbId,
        channel_id: DbId,
    ) -> Result<SubscriptionToggle, sqlx::Error> {
        let (is_subscribed, changed, snapshot_count): (bool, bool, i64) = sqlx::query_as(
            "WITH removed AS (
                 DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2
                 RETURNING id
             ), inserted AS (
                 INSERT INTO subscriptions (subscriber_id, channel_id)
                 SELECT $1, $2 WHERE NOT EXISTS (SELECT 1 FROM removed)
                 ON CONFLICT ON CONSTRAINT uq_subscriptions_pair DO NOTHING
                 RETURNING id
             )
             SELECT NOT EXISTS (SELECT 1 FROM removed) AS is_subscribed,
                    EXISTS (SELECT 1 FROM removed) OR EXISTS (SELECT 1 FROM inserted) AS changed,
                    (SELECT COUNT(*) FROM subscriptions WHERE channel_id = $2)
                      - (SELECT COUNT(*) FROM removed)
                      + (SELECT COUNT(*) FROM inserted) AS subscribers_count",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_one(pool)
        .await?;
        let subscribers_count = if changed {
            snapshot_count
        } else {
            Self::subscriber_count(pool, channel_id).await?
        };
        Ok(SubscriptionToggle {
            is_subscribed,
            subscribers_count,
        })
    }

    pub async fn subscriber_count(pool: &PgPool, channel_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
            .bind(channel_id)
            .fetch_one(pool)
            .await
    }

    /// One page of the users subscribed to `channel_id`, newest first.
    pub async fn list_subscribers(
        pool: &PgPool,
        channel_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<(Vec<ChannelSummary>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {columns}
             FROM subscriptions s
             JOIN users u ON u.id = s.subscriber_id
             WHERE s.channel_id = $2
             ORDER BY s.created_at DESC, s.id DESC
             LIMIT $3 OFFSET $4",
            columns = channel_columns(1),
        );
        let rows = sqlx::query_as::<_, ChannelRow>(&query)
            .bind(viewer)
            .bind(channel_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total = Self::subscriber_count(pool, channel_id).await?;
        Ok((rows.into_iter().map(ChannelSummary::from).collect(), total))
    }

    /// One page of the channels `subscriber_id` follows, each with its newest
    /// published video.
    pub async fn list_subscribed_channels(
        pool: &PgPool,
        subscriber_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<(Vec<SubscribedChannel>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {columns},
                    latest.id AS latest_video_id,
                    latest.video_url AS latest_video_url,
                    latest.thumbnail_url AS latest_thumbnail_url,
                    latest.title AS latest_title,
                    latest.duration AS latest_duration,
                    latest.views AS latest_views,
                    latest.created_at AS latest_created_at
             FROM subscriptions s
             JOIN users u ON u.id = s.channel_id
             LEFT JOIN LATERAL (
                 SELECT lv.id, lv.video_url, lv.thumbnail_url, lv.title, lv.duration,
                        lv.views, lv.created_at
                 FROM videos lv
                 WHERE lv.owner_id = u.id AND lv.is_published
                 ORDER BY lv.created_at DESC, lv.id DESC
                 LIMIT 1
             ) latest ON TRUE
             WHERE s.subscriber_id = $2
             ORDER BY s.created_at DESC, s.id DESC
             LIMIT $3 OFFSET $4",
            columns = channel_columns(1),
        );
        let rows = sqlx::query_as::<_, SubscribedChannelRow>(&query)
            .bind(viewer)
            .bind(subscriber_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
                .bind(subscriber_id)
                .fetch_one(pool)
                .await?;

        Ok((rows.into_iter().map(SubscribedChannel::from).collect(), total))
    }
}
