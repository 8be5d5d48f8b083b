//! Repository for the membership tables: `favorites`, `carts`, `follows`.
//!
//! Table and column names come from [`RelationKind`] and are never taken
//! from user input, so interpolating them into SQL is safe.

use foodgram_core::relation::RelationKind;
use foodgram_core::types::DbId;
use sqlx::PgPool;

/// Provides add/remove/exists operations for every [`RelationKind`].
pub struct RelationRepo;

impl RelationRepo {
    /// Whether the target row (recipe or user) exists.
    pub async fn target_exists(
        pool: &PgPool,
        kind: RelationKind,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)",
            kind.target_table()
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(target_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a membership row. Returns `false` if it already existed.
    ///
    /// Concurrent duplicate requests are resolved by the unique constraint:
    /// exactly one of them sees `true`.
    pub async fn add(
        pool: &PgPool,
        kind: RelationKind,
        user_id: DbId,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (user_id, {column}) VALUES ($1, $2) \
             ON CONFLICT (user_id, {column}) DO NOTHING",
            table = kind.table(),
            column = kind.target_column(),
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(target_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a membership row. Returns `true` if a row was removed.
    pub async fn remove(
        pool: &PgPool,
        kind: RelationKind,
        user_id: DbId,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE user_id = $1 AND {} = $2",
            kind.table(),
            kind.target_column(),
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(target_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the membership row exists.
    pub async fn exists(
        pool: &PgPool,
        kind: RelationKind,
        user_id: DbId,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND {} = $2)",
            kind.table(),
            kind.target_column(),
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(user_id)
            .bind(target_id)
            .fetch_one(pool)
            .await
    }
}
