//! Well-known role name constants and ownership checks.
//!
//! Role names must match the `CHECK` constraint on `users.role`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Mutations on a recipe are allowed for its author and for admins.
pub fn ensure_author_or_admin(
    author_id: DbId,
    user_id: DbId,
    role: &str,
) -> Result<(), CoreError> {
    if author_id == user_id || is_admin(role) {
        return Ok(());
    }
    Err(CoreError::Forbidden(
        "Only the author or an admin may modify this recipe".into(),
    ))
}
