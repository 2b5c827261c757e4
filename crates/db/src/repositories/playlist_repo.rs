//! Repository for the `playlists` and `playlist_videos` tables.

use sqlx::PgPool;
use vidhub_core::pagination::PageRequest;
use vidhub_core::types::DbId;

use crate::models::playlist::{CreatePlaylist, Playlist, PlaylistSummary, UpdatePlaylist};
use crate::models::video::{VideoCard, VideoCardRow};
use crate::repositories::video_repo::card_select;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

/// Playlist columns plus the count and summed views of the members the
/// viewer bound at `$viewer_param` may see, for `playlists p`. Hidden
/// members are left out so the totals agree with [`PlaylistRepo::videos`].
fn summary_select(viewer_param: usize) -> String {
    let visible = format!("(v.is_published OR v.owner_id = ${viewer_param}::BIGINT)");
    format!(
        "SELECT p.id, p.owner_id, p.name, p.description,
            (SELECT COUNT(*)
               FROM playlist_videos pv
               JOIN videos v ON v.id = pv.video_id
              WHERE pv.playlist_id = p.id AND {visible}) AS total_videos,
            (SELECT COALESCE(SUM(v.views), 0)::BIGINT
               FROM playlist_videos pv
               JOIN videos v ON v.id = pv.video_id
              WHERE pv.playlist_id = p.id AND {visible}) AS total_views,
            p.created_at, p.updated_at
         FROM playlists p"
    )
}

/// Provides CRUD and membership operations for playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    /// Insert a new playlist, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlaylist) -> Result<Playlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO playlists (owner_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a playlist. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlaylist,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "UPDATE playlists SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a playlist and its membership rows. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append `video_id` to the end of the playlist.
    ///
    /// Returns `false` if the video was already a member; membership is a set.
    pub async fn add_video(
        pool: &PgPool,
        playlist_id: DbId,
        video_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO playlist_videos (playlist_id, video_id, position)
             SELECT $1, $2, COALESCE(MAX(position), 0) + 1
             FROM playlist_videos WHERE playlist_id = $1
             ON CONFLICT ON CONSTRAINT uq_playlist_videos_pair DO NOTHING",
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` if the video was not a member.
    pub async fn remove_video(
        pool: &PgPool,
        playlist_id: DbId,
        video_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
                .bind(playlist_id)
                .bind(video_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A single playlist with the counts `viewer` is allowed to see.
    pub async fn summary(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<PlaylistSummary>, sqlx::Error> {
        let query = format!("{} WHERE p.id = $2", summary_select(1));
        sqlx::query_as::<_, PlaylistSummary>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of a user's playlists, newest first, with the counts `viewer`
    /// is allowed to see.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<(Vec<PlaylistSummary>, i64), sqlx::Error> {
        let query = format!(
            "{select}
             WHERE p.owner_id = $2
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $3 OFFSET $4",
            select = summary_select(1),
        );
        let rows = sqlx::query_as::<_, PlaylistSummary>(&query)
            .bind(viewer)
            .bind(owner_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok((rows, total))
    }

    /// The playlist's videos in insertion order. Unpublished videos are only
    /// included for their owner.
    pub async fn videos(
        pool: &PgPool,
        playlist_id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Vec<VideoCard>, sqlx::Error> {
        let query = format!(
            "{select}
             JOIN playlist_videos pl ON pl.video_id = v.id
             WHERE pl.playlist_id = $2 AND (v.is_published OR v.owner_id = $1::BIGINT)
             ORDER BY pl.position ASC, v.id ASC",
            select = card_select(1),
        );
        let rows = sqlx::query_as::<_, VideoCardRow>(&query)
            .bind(viewer)
            .bind(playlist_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(VideoCard::from).collect())
    }
}
