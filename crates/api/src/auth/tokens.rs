//! The token lifecycle: issue, verify, rotate, revoke.
//!
//! A user has at most one live refresh token: the one whose digest is stored
//! in `users.refresh_token_hash`. Issuing a pair overwrites the digest,
//! rotating swaps it with compare-and-swap, and revoking clears it, so a
//! superseded or logged-out refresh token can never be exchanged again.

use serde::Serialize;
use sqlx::PgPool;
use vidhub_core::types::DbId;
use vidhub_db::models::user::User;
use vidhub_db::repositories::UserRepo;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, validate_access_token,
    validate_refresh_token, AccessClaims, JwtConfig,
};
use crate::error::{unauthorized, AppError, AppResult};

/// A freshly issued access / refresh token pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and validates token pairs against the credential store.
pub struct TokenService<'a> {
    pool: &'a PgPool,
    config: &'a JwtConfig,
}

impl<'a> TokenService<'a> {
    pub fn new(pool: &'a PgPool, config: &'a JwtConfig) -> Self {
        Self { pool, config }
    }

    fn sign_pair(&self, user: &User) -> AppResult<TokenPair> {
        let access_token = generate_access_token(user, self.config)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
        let refresh_token = generate_refresh_token(user.id, self.config)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Sign a new pair and make its refresh token the only live one.
    pub async fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        let pair = self.sign_pair(user)?;
        let stored = UserRepo::set_refresh_token_hash(
            self.pool,
            user.id,
            &hash_refresh_token(&pair.refresh_token),
        )
        .await?;
        if !stored {
            return Err(unauthorized("User no longer exists"));
        }
        tracing::debug!(user_id = user.id, "Issued token pair");
        Ok(pair)
    }

    /// Verify an access token. Never touches storage.
    pub fn verify_access(&self, token: &str) -> AppResult<AccessClaims> {
        validate_access_token(token, self.config).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            unauthorized("Invalid access token")
        })
    }

    /// Exchange `presented` for a new pair.
    ///
    /// Fails with `Unauthorized` and changes nothing if the token is not
    /// validly signed, has expired, names a missing user, or is not the
    /// user's current refresh token.
    pub async fn rotate(&self, presented: &str) -> AppResult<(User, TokenPair)> {
        let claims = validate_refresh_token(presented, self.config).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            unauthorized("Invalid refresh token")
        })?;

        let user = UserRepo::find_by_id(self.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("Invalid refresh token"))?;

        let current = hash_refresh_token(presented);
        if user.refresh_token_hash.as_deref() != Some(current.as_str()) {
            tracing::debug!(user_id = user.id, "Superseded refresh token presented");
            return Err(unauthorized("Refresh token is expired or used"));
        }

        let pair = self.sign_pair(&user)?;
        let swapped = UserRepo::rotate_refresh_token_hash(
            self.pool,
            user.id,
            &current,
            &hash_refresh_token(&pair.refresh_token),
        )
        .await?;
        // A concurrent rotation or logout won the swap.
        if !swapped {
            return Err(unauthorized("Refresh token is expired or used"));
        }

        tracing::debug!(user_id = user.id, "Rotated refresh token");
        Ok((user, pair))
    }

    /// Forget the stored refresh token so no future `rotate` succeeds.
    pub async fn revoke(&self, user_id: DbId) -> AppResult<()> {
        UserRepo::clear_refresh_token_hash(self.pool, user_id).await?;
        tracing::debug!(user_id, "Revoked refresh token");
        Ok(())
    }
}
