//! Domain primitives shared by every vidhub crate.
//!
//! Nothing in here performs I/O; the database, media host, and HTTP layers
//! build on these types.

pub mod error;
pub mod like_target;
pub mod media;
pub mod ownership;
pub mod pagination;
pub mod search;
pub mod types;
pub mod validation;
