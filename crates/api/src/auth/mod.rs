//! Authentication primitives and the token lifecycle.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signing and verifying access / refresh JWTs.
//! - [`tokens`] -- issuing, rotating, and revoking token pairs against the
//!   stored refresh-token digest.

pub mod jwt;
pub mod password;
pub mod tokens;
