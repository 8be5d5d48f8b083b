//! Tag model and DTOs.

use foodgram_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// A tag joined to the recipe it is attached to, used for batch loading.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeTagRow {
    pub recipe_id: DbId,
    #[sqlx(flatten)]
    pub tag: Tag,
}

/// DTO for creating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}
