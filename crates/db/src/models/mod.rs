//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create / update DTOs for the repository layer
//! - Joined "view" structs carrying per-viewer fields, built from flat rows
//!   (see [`crate::aggregate`])
//!
//! Output structs serialize in camelCase.

pub mod comment;
pub mod like;
pub mod owner;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;
