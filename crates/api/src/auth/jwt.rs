//! Access- and refresh-token signing and verification.
//!
//! Both tokens are HS256 JWTs, signed with *different* secrets so one can
//! never be accepted in place of the other. Access tokens carry identity
//! claims; refresh tokens carry only the user id. Only the SHA-256 digest of
//! a refresh token is ever persisted.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use vidhub_core::types::DbId;
use vidhub_db::models::user::User;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub email: String,
    pub username: String,
    pub full_name: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Claims embedded in every refresh token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    pub sub: DbId,
    pub iat: i64,
    pub exp: i64,
    /// Makes two refresh tokens issued in the same second distinct.
    pub jti: String,
}

/// Secrets and lifetimes for both token kinds.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 10).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 10;

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `ACCESS_TOKEN_SECRET`       | **yes**  | --      |
    /// | `REFRESH_TOKEN_SECRET`      | **yes**  | --      |
    /// | `ACCESS_TOKEN_EXPIRY_MINS`  | no       | `60`    |
    /// | `REFRESH_TOKEN_EXPIRY_DAYS` | no       | `10`    |
    ///
    /// # Panics
    ///
    /// Panics if a secret is missing or empty, or if both secrets are equal.
    pub fn from_env() -> Self {
        let access_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .expect("ACCESS_TOKEN_SECRET must be set in the environment");
        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .expect("REFRESH_TOKEN_SECRET must be set in the environment");
        assert!(!access_secret.is_empty(), "ACCESS_TOKEN_SECRET must not be empty");
        assert!(!refresh_secret.is_empty(), "REFRESH_TOKEN_SECRET must not be empty");
        assert_ne!(
            access_secret, refresh_secret,
            "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ"
        );

        let access_token_expiry_mins: i64 = std::env::var("ACCESS_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("ACCESS_TOKEN_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("REFRESH_TOKEN_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("REFRESH_TOKEN_EXPIRY_DAYS must be a valid i64");

        Self {
            access_secret,
            refresh_secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }

    /// Access token lifetime in seconds.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Refresh token lifetime in seconds.
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_token_expiry_days * 24 * 60 * 60
    }
}

/// Sign an access token carrying `user`'s identity claims.
pub fn generate_access_token(
    user: &User,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        iat: now,
        exp: now + config.access_ttl_secs(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.access_secret.as_bytes()),
    )
}

/// Sign a refresh token for `user_id`.
pub fn generate_refresh_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = RefreshClaims {
        sub: user_id,
        iat: now,
        exp: now + config.refresh_ttl_secs(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
    )
}

/// Verify an access token's signature and expiry. Does not touch storage.
pub fn validate_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.access_secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(data.claims)
}

/// Verify a refresh token's signature and expiry.
pub fn validate_refresh_token(
    token: &str,
    config: &JwtConfig,
) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
    let data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// SHA-256 hex digest of a refresh token, as stored on the user row.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret-that-is-long-enough".to_string(),
            refresh_secret: "refresh-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 10,
        }
    }

    fn test_user() -> User {
        let now = chrono::Utc::now();
        User {
            id: 42,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            full_name: "Alice Liddell".to_string(),
            password_hash: "unused".to_string(),
            avatar_url: "https://media.test/a.png".to_string(),
            cover_image_url: None,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn access_token_round_trips_identity_claims() {
        let config = test_config();
        let token = generate_access_token(&test_user(), &config).unwrap();

        let claims = validate_access_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.full_name, "Alice Liddell");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_access_token_fails() {
        let config = test_config();

        // Well past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 1,
            email: "a@x.com".to_string(),
            username: "a".to_string(),
            full_name: "A".to_string(),
            iat: now - 600,
            exp: now - 300,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn refresh_and_access_tokens_are_not_interchangeable() {
        let config = test_config();
        let refresh = generate_refresh_token(7, &config).unwrap();
        let access = generate_access_token(&test_user(), &config).unwrap();

        assert!(validate_access_token(&refresh, &config).is_err());
        assert!(validate_refresh_token(&access, &config).is_err());
        assert_eq!(validate_refresh_token(&refresh, &config).unwrap().sub, 7);
    }

    #[test]
    fn refresh_tokens_issued_together_differ() {
        let config = test_config();
        let a = generate_refresh_token(7, &config).unwrap();
        let b = generate_refresh_token(7, &config).unwrap();
        assert_ne!(a, b);
        assert_ne!(hash_refresh_token(&a), hash_refresh_token(&b));
    }

    #[test]
    fn refresh_digest_is_stable_hex() {
        let hash = hash_refresh_token("token");
        assert_eq!(hash, hash_refresh_token("token"));
        assert_eq!(hash.len(), 64);
    }
}
