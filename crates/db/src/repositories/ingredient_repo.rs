//! Repository for the `ingredients` table.

use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::ingredient::{CreateIngredient, Ingredient};

const COLUMNS: &str = "id, name, measurement_unit";

/// Read access to the ingredient catalog.
pub struct IngredientRepo;

impl IngredientRepo {
    /// Insert a new ingredient, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateIngredient,
    ) -> Result<Ingredient, sqlx::Error> {
        let query = format!(
            "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(&input.name)
            .bind(&input.measurement_unit)
            .fetch_one(pool)
            .await
    }

    /// Find an ingredient by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients WHERE id = $1");
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ingredients whose name starts with `prefix` (case-insensitive).
    ///
    /// `None` or an empty prefix lists the whole catalog.
    pub async fn search(
        pool: &PgPool,
        prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, sqlx::Error> {
        let pattern = format!("{}%", escape_like(prefix.unwrap_or("")).to_lowercase());
        let query = format!(
            "SELECT {COLUMNS} FROM ingredients \
             WHERE LOWER(name) LIKE $1 ESCAPE '\\' \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(&pattern)
            .fetch_all(pool)
            .await
    }

    /// Return the subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM ingredients WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
