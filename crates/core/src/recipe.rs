//! Recipe input rules and list filters.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldErrors};
use crate::pagination::last_value;
use crate::types::DbId;

/// Minimum cooking time in minutes.
pub const MIN_COOKING_TIME: i32 = 1;

/// Minimum amount of an ingredient in a recipe.
pub const MIN_AMOUNT: i32 = 1;

/// Maximum length of a recipe name.
pub const MAX_RECIPE_NAME_LENGTH: usize = 200;

/// An `(ingredient id, amount)` pair as submitted by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: DbId,
    pub amount: i32,
}

/// Borrowed view of a recipe payload for validation.
#[derive(Debug, Clone, Copy)]
pub struct RecipeFields<'a> {
    pub name: &'a str,
    pub image: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub tags: &'a [DbId],
    pub ingredients: &'a [IngredientAmount],
}

/// Validate every field of a create/update payload.
///
/// All problems are collected so the client sees them at once. References
/// to tags and ingredients are only checked for shape here; existence is
/// verified against the database by the caller (see [`missing_ids`]).
pub fn validate_recipe(fields: &RecipeFields<'_>) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();

    let name = fields.name.trim();
    if name.is_empty() {
        errors.add("name", "This field may not be blank.");
    } else if name.chars().count() > MAX_RECIPE_NAME_LENGTH {
        errors.add(
            "name",
            format!("Ensure this field has no more than {MAX_RECIPE_NAME_LENGTH} characters."),
        );
    }
    if fields.image.trim().is_empty() {
        errors.add("image", "This field may not be blank.");
    }
    if fields.text.trim().is_empty() {
        errors.add("text", "This field may not be blank.");
    }
    if fields.cooking_time < MIN_COOKING_TIME {
        errors.add(
            "cooking_time",
            format!("Ensure this value is greater than or equal to {MIN_COOKING_TIME}."),
        );
    }

    if fields.tags.is_empty() {
        errors.add("tags", "At least one tag is required.");
    } else if has_duplicates(fields.tags.iter().copied()) {
        errors.add("tags", "Tags must not repeat.");
    }

    if fields.ingredients.is_empty() {
        errors.add("ingredients", "At least one ingredient is required.");
    } else {
        if has_duplicates(fields.ingredients.iter().map(|i| i.id)) {
            errors.add("ingredients", "Ingredients must not repeat.");
        }
        for item in fields.ingredients.iter().filter(|i| i.amount < MIN_AMOUNT) {
            errors.add(
                "ingredients",
                format!(
                    "Amount of ingredient {} must be greater than or equal to {MIN_AMOUNT}.",
                    item.id
                ),
            );
        }
    }

    errors.into_result()
}

/// Ids from `requested` that are absent from `found`, in request order.
pub fn missing_ids(requested: &[DbId], found: &[DbId]) -> Vec<DbId> {
    let found: HashSet<DbId> = found.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

/// Field error for references that do not exist, or `Ok` if none are missing.
pub fn ensure_all_exist(field: &str, entity: &str, missing: &[DbId]) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    for id in missing {
        errors.add(field, format!("{entity} with id {id} does not exist."));
    }
    errors.into_result()
}

fn has_duplicates(ids: impl Iterator<Item = DbId>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().any(|id| !seen.insert(id))
}

// ---------------------------------------------------------------------------
// List filters
// ---------------------------------------------------------------------------

/// Filters accepted by `GET /recipes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag slugs; a recipe matches if it carries any of them.
    pub tags: Vec<String>,
    /// Author ids; a recipe matches if any of them wrote it.
    pub authors: Vec<DbId>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeFilter {
    /// Build a filter from decoded query pairs. `tags` and `author` may repeat.
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self, CoreError> {
        let mut errors = FieldErrors::new();

        let tags = pairs
            .iter()
            .filter(|(k, v)| k == "tags" && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect();

        let mut authors = Vec::new();
        for (_, raw) in pairs.iter().filter(|(k, v)| k == "author" && !v.is_empty()) {
            match raw.parse::<DbId>() {
                Ok(id) => authors.push(id),
                Err(_) => errors.add(
                    "author",
                    format!("Select a valid choice. {raw} is not a valid id."),
                ),
            }
        }

        let mut flag = |key: &str| match last_value(pairs, key) {
            None | Some("") => false,
            Some(raw) => parse_flag(raw).unwrap_or_else(|| {
                errors.add(key, "Must be one of 0, 1, true, false.");
                false
            }),
        };
        let is_favorited = flag("is_favorited");
        let is_in_shopping_cart = flag("is_in_shopping_cart");

        errors.into_result()?;
        Ok(Self {
            tags,
            authors,
            is_favorited,
            is_in_shopping_cart,
        })
    }

    /// Reject tag slugs and author ids that do not exist.
    ///
    /// `known_tags` and `known_authors` are the subsets of the filter's
    /// values found in the database.
    pub fn ensure_known(
        &self,
        known_tags: &[String],
        known_authors: &[DbId],
    ) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        for slug in self.tags.iter().filter(|slug| !known_tags.contains(slug)) {
            errors.add(
                "tags",
                format!("Select a valid choice. {slug} is not one of the available choices."),
            );
        }
        for id in missing_ids(&self.authors, known_authors) {
            errors.add(
                "author",
                format!("Select a valid choice. {id} is not one of the available choices."),
            );
        }
        errors.into_result()
    }

    /// Drop the per-user flags for anonymous viewers.
    pub fn for_viewer(mut self, viewer: Option<DbId>) -> Self {
        if viewer.is_none() {
            self.is_favorited = false;
            self.is_in_shopping_cart = false;
        }
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
