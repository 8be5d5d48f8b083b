//! Token session model and DTOs.

use foodgram_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// A row from the `sessions` table. One row per issued token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    /// The `jti` claim of the issued token.
    pub token_id: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// DTO for recording a newly issued token.
#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub user_id: DbId,
    pub token_id: String,
    pub expires_at: Timestamp,
}
