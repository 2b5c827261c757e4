//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vidhub_core::types::{DbId, Timestamp};

use crate::models::owner::OwnerSummary;

/// Full user row from the `users` table.
///
/// Contains the password hash and refresh-token digest -- NEVER serialize this
/// to API responses directly. Use [`PublicUser`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub refresh_token_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The summary embedded next to content this user owns.
    pub fn summary(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            avatar: self.avatar_url.clone(),
        }
    }
}

/// Safe user representation for API responses (no credentials).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "coverImage")]
    pub cover_image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user. `username` and `email` must already be
/// case-folded.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

/// DTO for the self-service account update. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// A user's public channel page.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "coverImage")]
    pub cover_image_url: Option<String>,
    pub subscribers_count: i64,
    pub channels_subscribed_to_count: i64,
    pub is_subscribed: bool,
    pub created_at: Timestamp,
}
