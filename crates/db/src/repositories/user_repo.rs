//! Repository for the `users` and `watch_history` tables.

use sqlx::PgPool;
use vidhub_core::types::DbId;

use crate::aggregate;
use crate::models::user::{ChannelProfile, CreateUser, UpdateAccount, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, \
                        cover_image_url, refresh_token_hash, created_at, updated_at";

/// Provides CRUD and credential operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate username or email fails with a unique violation on
    /// `uq_users_username` / `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, full_name, password_hash, avatar_url, cover_image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(&input.avatar_url)
            .bind(&input.cover_image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user whose username or email equals `login` (already case-folded).
    pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $1 LIMIT 1");
        sqlx::query_as::<_, User>(&query)
            .bind(login)
            .fetch_optional(pool)
            .await
    }

    /// Find any user holding either `username` or `email`.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $2 LIMIT 1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Update account details. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_account(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .fetch_optional(pool)
            .await
    }

    /// Replace the avatar URL.
    pub async fn update_avatar(
        pool: &PgPool,
        id: DbId,
        avatar_url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET avatar_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Replace the cover image URL.
    pub async fn update_cover_image(
        pool: &PgPool,
        id: DbId,
        cover_image_url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("UPDATE users SET cover_image_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(cover_image_url)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store the digest of a freshly issued refresh token, replacing any
    /// previous one.
    pub async fn set_refresh_token_hash(
        pool: &PgPool,
        id: DbId,
        hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET refresh_token_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Swap `current` for `next` only if `current` is still the stored digest.
    ///
    /// Returns `false` when the token was already rotated or revoked, so at
    /// most one of several concurrent rotations of the same token succeeds.
    pub async fn rotate_refresh_token_hash(
        pool: &PgPool,
        id: DbId,
        current: &str,
        next: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token_hash = $3
             WHERE id = $1 AND refresh_token_hash = $2",
        )
        .bind(id)
        .bind(current)
        .bind(next)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Forget the stored refresh token. Returns `true` if one was stored.
    pub async fn clear_refresh_token_hash(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token_hash = NULL
             WHERE id = $1 AND refresh_token_hash IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A user's channel page with subscription counts relative to `viewer`.
    pub async fn channel_profile(
        pool: &PgPool,
        username: &str,
        viewer: Option<DbId>,
    ) -> Result<Option<ChannelProfile>, sqlx::Error> {
        let query = format!(
            "SELECT u.id, u.username, u.email, u.full_name, u.avatar_url, u.cover_image_url,
                    {subscribers} AS subscribers_count,
                    {subscribed_to} AS channels_subscribed_to_count,
                    {is_subscribed} AS is_subscribed,
                    u.created_at
             FROM users u
             WHERE u.username = $2",
            subscribers = aggregate::subscriber_count("u.id"),
            subscribed_to = aggregate::subscribed_to_count("u.id"),
            is_subscribed = aggregate::subscribed_by_viewer("u.id", 1),
        );
        sqlx::query_as::<_, ChannelProfile>(&query)
            .bind(viewer)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Add `video_id` to the user's watch history, or refresh its timestamp.
    pub async fn record_watch(
        pool: &PgPool,
        user_id: DbId,
        video_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO watch_history (user_id, video_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_watch_history_pair
             DO UPDATE SET watched_at = NOW()",
        )
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
