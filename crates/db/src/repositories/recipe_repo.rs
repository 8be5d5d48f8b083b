//! Repository for `recipes` and their `recipe_tags` / `recipe_ingredients` links.
//!
//! Every read that feeds the full representation takes the viewer id
//! (`None` for anonymous requests) so `is_favorited`, `is_in_shopping_cart`
//! and the author's `is_subscribed` are computed for that viewer.

use std::collections::HashMap;

use foodgram_core::recipe::{IngredientAmount, RecipeFilter};
use foodgram_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::ingredient::{RecipeIngredient, RecipeIngredientRow};
use crate::models::recipe::{
    AuthorRecipeRow, Recipe, RecipeDetail, RecipeRow, RecipeShort, SaveRecipe,
};
use crate::models::tag::{RecipeTagRow, Tag};
use crate::repositories::UserRepo;

/// Column list for `recipes` queries.
const COLUMNS: &str = "id, author_id, name, image, text, cooking_time, created_at";

/// Recipe columns plus viewer flags. `$1` is the viewer id.
const ROW_SELECT: &str = "\
    SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.created_at, \
           EXISTS (SELECT 1 FROM favorites f \
                   WHERE f.recipe_id = r.id AND f.user_id = $1::bigint) AS is_favorited, \
           EXISTS (SELECT 1 FROM carts c \
                   WHERE c.recipe_id = r.id AND c.user_id = $1::bigint) AS is_in_shopping_cart \
    FROM recipes r";

/// List filter. `$1` viewer, `$2` author, `$3` tag slugs, `$4`/`$5` flags.
const FILTER_WHERE: &str = "\
    WHERE (cardinality($2::bigint[]) = 0 OR r.author_id = ANY($2)) \
      AND (cardinality($3::text[]) = 0 OR EXISTS ( \
            SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
            WHERE rt.recipe_id = r.id AND t.slug = ANY($3))) \
      AND (NOT $4::boolean OR EXISTS ( \
            SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = $1::bigint)) \
      AND (NOT $5::boolean OR EXISTS ( \
            SELECT 1 FROM carts c WHERE c.recipe_id = r.id AND c.user_id = $1::bigint))";

/// Newest first; id breaks ties so pages are stable.
const ORDER_BY: &str = "ORDER BY r.created_at DESC, r.id DESC";

/// Provides CRUD operations for recipes.
pub struct RecipeRepo;

impl RecipeRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a recipe with its tag and ingredient links in one transaction.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &SaveRecipe,
    ) -> Result<Recipe, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO recipes (author_id, name, image, text, cooking_time) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&query)
            .bind(author_id)
            .bind(input.name.trim())
            .bind(&input.image)
            .bind(&input.text)
            .bind(input.cooking_time)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_links(&mut tx, recipe.id, &input.tags, &input.ingredients).await?;

        tx.commit().await?;
        Ok(recipe)
    }

    /// Replace a recipe's fields and all of its links.
    ///
    /// Links are cleared and re-inserted rather than diffed. Any failure
    /// rolls back the whole update. Returns `None` if the recipe is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SaveRecipe,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE recipes SET name = $2, image = $3, text = $4, cooking_time = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(recipe) = sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(input.name.trim())
            .bind(&input.image)
            .bind(&input.text)
            .bind(input.cooking_time)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_links(&mut tx, id, &input.tags, &input.ingredients).await?;

        tx.commit().await?;
        Ok(Some(recipe))
    }

    /// Delete a recipe. Links, favorites and cart rows cascade.
    ///
    /// Returns `true` if a recipe was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_links(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
        tag_ids: &[DbId],
        ingredients: &[IngredientAmount],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) \
             SELECT $1, tag_id FROM UNNEST($2::bigint[]) AS t(tag_id)",
        )
        .bind(recipe_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;

        let ingredient_ids: Vec<DbId> = ingredients.iter().map(|i| i.id).collect();
        let amounts: Vec<i32> = ingredients.iter().map(|i| i.amount).collect();
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) \
             SELECT $1, ingredient_id, amount \
             FROM UNNEST($2::bigint[], $3::int[]) AS t(ingredient_id, amount)",
        )
        .bind(recipe_id)
        .bind(&ingredient_ids)
        .bind(&amounts)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a recipe row by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes WHERE id = $1");
        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Short representation of one recipe.
    pub async fn find_short(pool: &PgPool, id: DbId) -> Result<Option<RecipeShort>, sqlx::Error> {
        sqlx::query_as::<_, RecipeShort>(
            "SELECT id, name, image, cooking_time FROM recipes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Full representation of one recipe as seen by `viewer`.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<RecipeDetail>, sqlx::Error> {
        let query = format!("{ROW_SELECT} WHERE r.id = $2");
        let row = sqlx::query_as::<_, RecipeRow>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::hydrate(pool, vec![row], viewer).await?.pop()),
            None => Ok(None),
        }
    }

    /// One page of recipes matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &RecipeFilter,
        viewer: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeDetail>, sqlx::Error> {
        let query = format!("{ROW_SELECT} {FILTER_WHERE} {ORDER_BY} LIMIT $6 OFFSET $7");
        let rows = sqlx::query_as::<_, RecipeRow>(&query)
            .bind(viewer)
            .bind(&filter.authors)
            .bind(&filter.tags)
            .bind(filter.is_favorited)
            .bind(filter.is_in_shopping_cart)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Self::hydrate(pool, rows, viewer).await
    }

    /// Number of recipes matching `filter`.
    pub async fn count(
        pool: &PgPool,
        filter: &RecipeFilter,
        viewer: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM recipes r {FILTER_WHERE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(viewer)
            .bind(&filter.authors)
            .bind(&filter.tags)
            .bind(filter.is_favorited)
            .bind(filter.is_in_shopping_cart)
            .fetch_one(pool)
            .await
    }

    /// Up to `limit` newest short recipes per author (all when `None`).
    pub async fn previews_by_authors(
        pool: &PgPool,
        author_ids: &[DbId],
        limit: Option<i64>,
    ) -> Result<HashMap<DbId, Vec<RecipeShort>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AuthorRecipeRow>(
            "SELECT author_id, id, name, image, cooking_time FROM ( \
                 SELECT r.author_id, r.id, r.name, r.image, r.cooking_time, \
                        ROW_NUMBER() OVER ( \
                            PARTITION BY r.author_id \
                            ORDER BY r.created_at DESC, r.id DESC) AS rn \
                 FROM recipes r \
                 WHERE r.author_id = ANY($1)) ranked \
             WHERE $2::bigint IS NULL OR rn <= $2 \
             ORDER BY author_id, rn",
        )
        .bind(author_ids)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<RecipeShort>> = HashMap::new();
        for row in rows {
            grouped.entry(row.author_id).or_default().push(row.recipe);
        }
        Ok(grouped)
    }

    /// Total number of recipes per author.
    pub async fn counts_by_authors(
        pool: &PgPool,
        author_ids: &[DbId],
    ) -> Result<HashMap<DbId, i64>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (DbId, i64)>(
            "SELECT author_id, COUNT(*) FROM recipes \
             WHERE author_id = ANY($1) \
             GROUP BY author_id",
        )
        .bind(author_ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    // -----------------------------------------------------------------------
    // Representation assembly
    // -----------------------------------------------------------------------

    /// Attach tags, ingredients and author profiles to recipe rows.
    ///
    /// Uses one query per relation regardless of how many rows are given.
    /// Row order is preserved.
    async fn hydrate(
        pool: &PgPool,
        rows: Vec<RecipeRow>,
        viewer: Option<DbId>,
    ) -> Result<Vec<RecipeDetail>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = rows.iter().map(|r| r.recipe.id).collect();
        let mut author_ids: Vec<DbId> = rows.iter().map(|r| r.recipe.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags = Self::tags_for(pool, &ids).await?;
        let mut ingredients = Self::ingredients_for(pool, &ids).await?;
        let authors = UserRepo::find_profiles(pool, &author_ids, viewer).await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let recipe = row.recipe;
            let Some(author) = authors.get(&recipe.author_id).cloned() else {
                tracing::warn!(
                    recipe_id = recipe.id,
                    author_id = recipe.author_id,
                    "Recipe author missing"
                );
                continue;
            };
            details.push(RecipeDetail {
                id: recipe.id,
                tags: tags.remove(&recipe.id).unwrap_or_default(),
                author,
                ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                is_favorited: row.is_favorited,
                is_in_shopping_cart: row.is_in_shopping_cart,
                name: recipe.name,
                image: recipe.image,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
            });
        }
        Ok(details)
    }

    async fn tags_for(
        pool: &PgPool,
        recipe_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Tag>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RecipeTagRow>(
            "SELECT rt.recipe_id, t.id, t.name, t.color, t.slug \
             FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = ANY($1) \
             ORDER BY rt.recipe_id, t.id",
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<Tag>> = HashMap::new();
        for row in rows {
            grouped.entry(row.recipe_id).or_default().push(row.tag);
        }
        Ok(grouped)
    }

    async fn ingredients_for(
        pool: &PgPool,
        recipe_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<RecipeIngredient>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RecipeIngredientRow>(
            "SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount \
             FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = ANY($1) \
             ORDER BY ri.recipe_id, ri.id",
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<RecipeIngredient>> = HashMap::new();
        for row in rows {
            grouped.entry(row.recipe_id).or_default().push(row.ingredient);
        }
        Ok(grouped)
    }
}
