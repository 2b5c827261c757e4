//! Repository for the `videos` table and the video card listings built on it.

use sqlx::PgPool;
use vidhub_core::like_target::LikeKind;
use vidhub_core::pagination::PageRequest;
use vidhub_core::types::DbId;

use crate::aggregate;
use crate::models::video::{
    CreateVideo, UpdateVideo, Video, VideoCard, VideoCardRow, VideoDetail, VideoDetailRow,
    VideoFilter,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, video_url, thumbnail_url, title, description, duration, \
                        views, is_published, created_at, updated_at";

/// `SELECT ... FROM videos v JOIN users u` producing a [`VideoCardRow`], with
/// the viewer bound at `$viewer_param`.
pub(crate) fn card_select(viewer_param: usize) -> String {
    format!(
        "SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description, v.duration,
                v.views, v.is_published, v.created_at,
                {owner},
                {likes} AS likes_count,
                {liked} AS is_liked
         FROM videos v
         JOIN users u ON u.id = v.owner_id",
        owner = aggregate::owner_columns("u"),
        likes = aggregate::like_count(LikeKind::Video, "v.id"),
        liked = aggregate::liked_by_viewer(LikeKind::Video, "v.id", viewer_param),
    )
}

/// Published videos, optionally matching a tsquery and a single owner.
fn published_filter(tsquery_param: usize, owner_param: usize) -> String {
    format!(
        "v.is_published
         AND (${tsquery_param}::TEXT IS NULL
              OR v.search_vector @@ to_tsquery('english', ${tsquery_param}::TEXT))
         AND (${owner_param}::BIGINT IS NULL OR v.owner_id = ${owner_param}::BIGINT)"
    )
}

/// Provides CRUD operations and listings for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (owner_id, video_url, thumbnail_url, title, description, duration)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.owner_id)
            .bind(&input.video_url)
            .bind(&input.thumbnail_url)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.duration)
            .fetch_one(pool)
            .await
    }

    /// Find a video by internal ID, regardless of publish state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a video. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                thumbnail_url = COALESCE($4, thumbnail_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_published`, returning the updated row.
    pub async fn toggle_published(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET is_published = NOT is_published
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a video. Comments, likes, playlist entries, and watch history
    /// referencing it cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count one more view.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// One page of published videos matching `filter`, with the total count.
    pub async fn list_published(
        pool: &PgPool,
        filter: &VideoFilter,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<(Vec<VideoCard>, i64), sqlx::Error> {
        let query = format!(
            "{select}
             WHERE {filter}
             ORDER BY {order}
             LIMIT $4 OFFSET $5",
            select = card_select(1),
            filter = published_filter(2, 3),
            order = filter.sort.order_by("v"),
        );
        let rows = sqlx::query_as::<_, VideoCardRow>(&query)
            .bind(viewer)
            .bind(&filter.tsquery)
            .bind(filter.owner_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!(
            "SELECT COUNT(*) FROM videos v WHERE {}",
            published_filter(1, 2)
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.tsquery)
            .bind(filter.owner_id)
            .fetch_one(pool)
            .await?;

        Ok((rows.into_iter().map(VideoCard::from).collect(), total))
    }

    /// A single video page with owner channel fields relative to `viewer`.
    ///
    /// Unpublished videos are only returned to their owner.
    pub async fn detail(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<VideoDetail>, sqlx::Error> {
        let query = format!(
            "SELECT card.*,
                    {subscribers} AS owner_subscribers_count,
                    {subscribed} AS owner_is_subscribed
             FROM ({select} WHERE v.id = $2 AND (v.is_published OR v.owner_id = $1::BIGINT)) card",
            select = card_select(1),
            subscribers = aggregate::subscriber_count("card.owner_id"),
            subscribed = aggregate::subscribed_by_viewer("card.owner_id", 1),
        );
        let row = sqlx::query_as::<_, VideoDetailRow>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(VideoDetail::from))
    }

    /// Videos `user_id` has liked, most recently liked first.
    pub async fn list_liked_by(
        pool: &PgPool,
        user_id: DbId,
        page: PageRequest,
    ) -> Result<(Vec<VideoCard>, i64), sqlx::Error> {
        const VISIBLE: &str = "(v.is_published OR v.owner_id = $1)";

        let query = format!(
            "{select}
             JOIN likes mine ON mine.video_id = v.id AND mine.liked_by = $1
             WHERE {VISIBLE}
             ORDER BY mine.created_at DESC, v.id DESC
             LIMIT $2 OFFSET $3",
            select = card_select(1),
        );
        let rows = sqlx::query_as::<_, VideoCardRow>(&query)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!(
            "SELECT COUNT(*) FROM videos v
             JOIN likes mine ON mine.video_id = v.id AND mine.liked_by = $1
             WHERE {VISIBLE}"
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok((rows.into_iter().map(VideoCard::from).collect(), total))
    }

    /// Videos in `user_id`'s watch history, most recently watched first.
    pub async fn list_watch_history(
        pool: &PgPool,
        user_id: DbId,
        page: PageRequest,
    ) -> Result<(Vec<VideoCard>, i64), sqlx::Error> {
        const VISIBLE: &str = "(v.is_published OR v.owner_id = $1)";

        let query = format!(
            "{select}
             JOIN watch_history wh ON wh.video_id = v.id AND wh.user_id = $1
             WHERE {VISIBLE}
             ORDER BY wh.watched_at DESC, v.id DESC
             LIMIT $2 OFFSET $3",
            select = card_select(1),
        );
        let rows = sqlx::query_as::<_, VideoCardRow>(&query)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!(
            "SELECT COUNT(*) FROM videos v
             JOIN watch_history wh ON wh.video_id = v.id AND wh.user_id = $1
             WHERE {VISIBLE}"
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok((rows.into_iter().map(VideoCard::from).collect(), total))
    }
}
