//! Recipe models and DTOs.

use foodgram_core::recipe::{IngredientAmount, RecipeFields};
use foodgram_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::ingredient::RecipeIngredient;
use crate::models::tag::Tag;
use crate::models::user::UserProfile;

/// A row from the `recipes` table.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: DbId,
    pub author_id: DbId,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: Timestamp,
}

/// A recipe row plus the viewer-relative membership flags.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    #[sqlx(flatten)]
    pub recipe: Recipe,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Short representation used by favorites, carts and subscription previews.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeShort {
    pub id: DbId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// A short recipe tagged with its author, used for batch loading previews.
#[derive(Debug, Clone, FromRow)]
pub struct AuthorRecipeRow {
    pub author_id: DbId,
    #[sqlx(flatten)]
    pub recipe: RecipeShort,
}

/// Full recipe representation returned by list, detail, create and update.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: DbId,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// DTO for `POST /recipes` and `PATCH /recipes/{id}`.
///
/// PATCH replaces the recipe wholesale, so every field is required in both.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveRecipe {
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<DbId>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

impl SaveRecipe {
    pub fn fields(&self) -> RecipeFields<'_> {
        RecipeFields {
            name: &self.name,
            image: &self.image,
            text: &self.text,
            cooking_time: self.cooking_time,
            tags: &self.tags,
            ingredients: &self.ingredients,
        }
    }
}
