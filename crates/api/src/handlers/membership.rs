//! Add/remove procedure shared by favorites, shopping cart and subscriptions.
//!
//! The caller loads whatever representation it answers with after a
//! successful add; removal always answers 204.

use foodgram_core::error::CoreError;
use foodgram_core::relation::RelationKind;
use foodgram_core::types::DbId;
use foodgram_db::repositories::RelationRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// Create the `(user, target)` membership row.
///
/// Checks, in order: the target exists (404), the self-relation guard
/// (400), and that the pair is new (400). A concurrent duplicate loses at
/// the unique constraint and gets the same "already exists" error.
pub async fn add_membership(
    pool: &PgPool,
    kind: RelationKind,
    user_id: DbId,
    target_id: DbId,
) -> AppResult<()> {
    ensure_target_exists(pool, kind, target_id).await?;
    kind.check_self(user_id, target_id)?;

    let inserted = RelationRepo::add(pool, kind, user_id, target_id).await?;
    kind.check_inserted(inserted)?;

    tracing::info!(user_id, target_id, relation = kind.table(), "Membership added");
    Ok(())
}

/// Delete the `(user, target)` membership row.
///
/// 404 if the target is missing, 400 if there was nothing to delete.
pub async fn remove_membership(
    pool: &PgPool,
    kind: RelationKind,
    user_id: DbId,
    target_id: DbId,
) -> AppResult<()> {
    ensure_target_exists(pool, kind, target_id).await?;

    let removed = RelationRepo::remove(pool, kind, user_id, target_id).await?;
    kind.check_removed(removed)?;

    tracing::info!(user_id, target_id, relation = kind.table(), "Membership removed");
    Ok(())
}

async fn ensure_target_exists(pool: &PgPool, kind: RelationKind, target_id: DbId) -> AppResult<()> {
    if RelationRepo::target_exists(pool, kind, target_id).await? {
        Ok(())
    } else {
        Err(CoreError::NotFound {
            entity: kind.target_entity(),
            id: target_id,
        }
        .into())
    }
}
