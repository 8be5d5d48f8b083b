//! Handlers for the `/ingredients` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use foodgram_core::error::{CoreError, FieldErrors};
use foodgram_core::types::DbId;
use foodgram_db::models::ingredient::{CreateIngredient, Ingredient, IngredientSearchParams};
use foodgram_db::repositories::IngredientRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Column width of `ingredients.name` and `ingredients.measurement_unit`.
const MAX_FIELD_LENGTH: usize = 200;

/// GET /api/ingredients?search=
///
/// Case-insensitive name-prefix search over the catalog, unpaginated.
pub async fn list_ingredients(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<IngredientSearchParams>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let ingredients = IngredientRepo::search(&state.pool, params.search.as_deref()).await?;
    Ok(Json(ingredients))
}

/// GET /api/ingredients/{id}
pub async fn get_ingredient(
    State(state): State<AppState>,
    AppPath(ingredient_id): AppPath<DbId>,
) -> AppResult<Json<Ingredient>> {
    let ingredient = IngredientRepo::find_by_id(&state.pool, ingredient_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Ingredient",
            id: ingredient_id,
        })?;
    Ok(Json(ingredient))
}

/// POST /api/ingredients
///
/// Add an ingredient to the catalog. Admin only.
pub async fn create_ingredient(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateIngredient>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    let input = CreateIngredient {
        name: input.name.trim().to_string(),
        measurement_unit: input.measurement_unit.trim().to_string(),
    };

    let mut errors = FieldErrors::new();
    for (field, value) in [
        ("name", &input.name),
        ("measurement_unit", &input.measurement_unit),
    ] {
        if value.is_empty() {
            errors.add(field, "This field may not be blank.");
        } else if value.chars().count() > MAX_FIELD_LENGTH {
            errors.add(
                field,
                format!("Ensure this field has no more than {MAX_FIELD_LENGTH} characters."),
            );
        }
    }
    errors.into_result()?;

    let ingredient = IngredientRepo::create(&state.pool, &input).await?;

    tracing::info!(
        ingredient_id = ingredient.id,
        user_id = admin.user_id,
        name = %ingredient.name,
        "Ingredient created"
    );
    Ok((StatusCode::CREATED, Json(ingredient)))
}
