//! Repository for the `likes` table.

use sqlx::PgPool;
use vidhub_core::like_target::LikeTarget;
use vidhub_core::types::DbId;

use crate::models::like::LikeToggle;

/// Provides the like toggle and counts.
pub struct LikeRepo;

impl LikeRepo {
    /// Like `target` if `user_id` has not, otherwise remove the like.
    ///
    /// Runs as a single statement. The partial unique indexes on `likes`
    /// guarantee at most one row per (user, target) even under concurrent
    /// toggles; a toggle that loses an insert race reports the like as
    /// present. The count is derived from the statement's snapshot adjusted
    /// by the rows it changed, except after a lost race, where the winning
    /// row committed after that snapshot and the count is read again.
    pub async fn toggle(
        pool: &PgPool,
        user_id: DbId,
        target: LikeTarget,
    ) -> Result<LikeToggle, sqlx::Error> {
        let col = target.kind().column();
        let query = format!(
            "WITH removed AS (
                 DELETE FROM likes WHERE liked_by = $1 AND {col} = $2
                 RETURNING id
             ), inserted AS (
                 INSERT INTO likes (liked_by, {col})
                 SELECT $1, $2 WHERE NOT EXISTS (SELECT 1 FROM removed)
                 ON CONFLICT DO NOTHING
                 RETURNING id
             )
             SELECT NOT EXISTS (SELECT 1 FROM removed) AS is_liked,
                    EXISTS (SELECT 1 FROM removed) OR EXISTS (SELECT 1 FROM inserted) AS changed,
                    (SELECT COUNT(*) FROM likes WHERE {col} = $2)
                      - (SELECT COUNT(*) FROM removed)
                      + (SELECT COUNT(*) FROM inserted) AS likes_count"
        );
        let (is_liked, changed, snapshot_count): (bool, bool, i64) = sqlx::query_as(&query)
            .bind(user_id)
            .bind(target.id())
            .fetch_one(pool)
            .await?;
        let likes_count = if changed {
            snapshot_count
        } else {
            Self::count(pool, target).await?
        };
        Ok(LikeToggle {
            is_liked,
            likes_count,
        })
    }

    /// Number of likes on `target`.
    pub async fn count(pool: &PgPool, target: LikeTarget) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM likes WHERE {} = $1",
            target.kind().column()
        );
        sqlx::query_scalar(&query)
            .bind(target.id())
            .fetch_one(pool)
            .await
    }

    /// Whether `user_id` currently likes `target`.
    pub async fn exists(
        pool: &PgPool,
        user_id: DbId,
        target: LikeTarget,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE liked_by = $1 AND {} = $2)",
            target.kind().column()
        );
        sqlx::query_scalar(&query)
            .bind(user_id)
            .bind(target.id())
            .fetch_one(pool)
            .await
    }
}
