//! Repository for the `tweets` table.

use sqlx::PgPool;
use vidhub_core::like_target::LikeKind;
use vidhub_core::pagination::PageRequest;
use vidhub_core::types::DbId;

use crate::aggregate;
use crate::models::tweet::{CreateTweet, Tweet, TweetRow, TweetView};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

/// Provides CRUD operations for tweets.
pub struct TweetRepo;

impl TweetRepo {
    /// Insert a new tweet, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTweet) -> Result<Tweet, sqlx::Error> {
        let query = format!(
            "INSERT INTO tweets (owner_id, content)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tweet>(&query)
            .bind(input.owner_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tweet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tweets WHERE id = $1");
        sqlx::query_as::<_, Tweet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Tweet>, sqlx::Error> {
        let query = format!("UPDATE tweets SET content = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tweet>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tweet and its likes. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of a user's tweets, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<(Vec<TweetView>, i64), sqlx::Error> {
        let query = format!(
            "SELECT t.id, t.content, t.created_at, t.updated_at,
                    {owner},
                    {likes} AS likes_count,
                    {liked} AS is_liked
             FROM tweets t
             JOIN users u ON u.id = t.owner_id
             WHERE t.owner_id = $2
             ORDER BY t.created_at DESC, t.id DESC
             LIMIT $3 OFFSET $4",
            owner = aggregate::owner_columns("u"),
            likes = aggregate::like_count(LikeKind::Tweet, "t.id"),
            liked = aggregate::liked_by_viewer(LikeKind::Tweet, "t.id", 1),
        );
        let rows = sqlx::query_as::<_, TweetRow>(&query)
            .bind(viewer)
            .bind(owner_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tweets WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok((rows.into_iter().map(TweetView::from).collect(), total))
    }
}
