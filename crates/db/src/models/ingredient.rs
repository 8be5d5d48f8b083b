//! Ingredient models, recipe ingredient lines and shopping list rows.

use foodgram_core::shopping_list::ShoppingListItem;
use foodgram_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ingredients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ingredient {
    pub id: DbId,
    pub name: String,
    pub measurement_unit: String,
}

/// An ingredient as it appears inside a recipe. `id` is the ingredient id.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeIngredient {
    pub id: DbId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A recipe ingredient line tagged with its recipe, used for batch loading.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRow {
    pub recipe_id: DbId,
    #[sqlx(flatten)]
    pub ingredient: RecipeIngredient,
}

/// One `(name, unit)` group of the shopping list aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct ShoppingListRow {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

impl From<ShoppingListRow> for ShoppingListItem {
    fn from(row: ShoppingListRow) -> Self {
        ShoppingListItem {
            name: row.name,
            measurement_unit: row.measurement_unit,
            total: row.total,
        }
    }
}

/// DTO for creating an ingredient.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Query parameters for `GET /ingredients`.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientSearchParams {
    /// Case-insensitive name prefix.
    pub search: Option<String>,
}
