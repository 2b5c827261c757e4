//! The single authorization predicate used by every mutating handler.
//!
//! Videos, comments, playlists, and tweets all implement [`Owned`]; handlers
//! load the row, then call [`ensure_owner`] before touching it.

use crate::error::CoreError;
use crate::types::DbId;

/// An entity with exactly one owning user.
pub trait Owned {
    /// Entity name used in error messages (e.g. `"Video"`).
    const ENTITY: &'static str;

    fn owner_id(&self) -> DbId;
}

/// Fail with `Forbidden` unless `principal_id` owns `entity`.
///
/// `action` is used in the error message (e.g. "update", "delete").
pub fn ensure_owner<T: Owned>(entity: &T, principal_id: DbId, action: &str) -> Result<(), CoreError> {
    if entity.owner_id() == principal_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "You are not allowed to {action} this {}",
            T::ENTITY.to_lowercase()
        )))
    }
}
