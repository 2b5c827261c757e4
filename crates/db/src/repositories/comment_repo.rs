//! Repository for the `comments` table.

use sqlx::PgPool;
use vidhub_core::like_target::LikeKind;
use vidhub_core::pagination::PageRequest;
use vidhub_core::types::DbId;

use crate::aggregate;
use crate::models::comment::{Comment, CommentRow, CommentView, CreateComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_id, owner_id, content, created_at, updated_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (video_id, owner_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.video_id)
            .bind(input.owner_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a comment's text. Returns `None` if the comment is gone.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("UPDATE comments SET content = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment and its likes. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of a video's comments, newest first.
    pub async fn list_for_video(
        pool: &PgPool,
        video_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<(Vec<CommentView>, i64), sqlx::Error> {
        let query = format!(
            "SELECT c.id, c.video_id, c.content, c.created_at, c.updated_at,
                    {owner},
                    {likes} AS likes_count,
                    {liked} AS is_liked
             FROM comments c
             JOIN users u ON u.id = c.owner_id
             WHERE c.video_id = $2
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT $3 OFFSET $4",
            owner = aggregate::owner_columns("u"),
            likes = aggregate::like_count(LikeKind::Comment, "c.id"),
            liked = aggregate::liked_by_viewer(LikeKind::Comment, "c.id", 1),
        );
        let rows = sqlx::query_as::<_, CommentRow>(&query)
            .bind(viewer)
            .bind(video_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(pool)
            .await?;

        Ok((rows.into_iter().map(CommentView::from).collect(), total))
    }
}
