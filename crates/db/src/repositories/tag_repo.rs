//! Repository for the `tags` table.

use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag};

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, name, color, slug";

/// Read access to tags plus creation for administrators.
pub struct TagRepo;

impl TagRepo {
    /// Insert a new tag, returning the created row.
    ///
    /// The color must already be validated; the table also enforces the
    /// `#RRGGBB` format with a CHECK constraint.
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3) RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .bind(&input.color)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every tag ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY id");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Return the subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Return the subset of `slugs` that exist.
    pub async fn existing_slugs(
        pool: &PgPool,
        slugs: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT slug FROM tags WHERE slug = ANY($1)")
            .bind(slugs)
            .fetch_all(pool)
            .await
    }
}
