//! Handlers for the `/recipes` resource, its favorite and shopping cart
//! memberships, and the shopping list download.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::recipe::{ensure_all_exist, missing_ids, validate_recipe, RecipeFilter};
use foodgram_core::relation::RelationKind;
use foodgram_core::roles::ensure_author_or_admin;
use foodgram_core::shopping_list::{self, ShoppingListItem};
use foodgram_core::types::DbId;
use foodgram_db::models::recipe::{Recipe, RecipeDetail, RecipeShort, SaveRecipe};
use foodgram_db::repositories::{IngredientRepo, RecipeRepo, ShoppingListRepo, TagRepo, UserRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, ListQuery};
use crate::handlers::membership::{add_membership, remove_membership};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Recipe CRUD
// ---------------------------------------------------------------------------

/// GET /api/recipes
///
/// Paginated, newest first. Filters: `tags` (slug, repeatable, any match),
/// `author` (id, repeatable), `is_favorited`, `is_in_shopping_cart`. The
/// last two only apply to authenticated viewers. Unknown slugs or author
/// ids are rejected.
pub async fn list_recipes(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    query: ListQuery,
) -> AppResult<Json<Page<RecipeDetail>>> {
    let viewer = viewer.viewer();
    let filter = RecipeFilter::from_query(&query.pairs)?.for_viewer(viewer);
    let known_tags = TagRepo::existing_slugs(&state.pool, &filter.tags).await?;
    let known_authors = UserRepo::existing_ids(&state.pool, &filter.authors).await?;
    filter.ensure_known(&known_tags, &known_authors)?;

    let page = query.page_request(state.config.page_size)?;

    let count = RecipeRepo::count(&state.pool, &filter, viewer).await?;
    page.ensure_in_range(count)?;
    let recipes =
        RecipeRepo::list(&state.pool, &filter, viewer, page.limit, page.offset()).await?;

    Ok(Json(query.page(&page, count, recipes)))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<Json<RecipeDetail>> {
    let recipe = load_detail(&state.pool, recipe_id, viewer.viewer()).await?;
    Ok(Json(recipe))
}

/// POST /api/recipes
///
/// Create a recipe authored by the caller. Returns 201 with the full
/// representation.
pub async fn create_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SaveRecipe>,
) -> AppResult<(StatusCode, Json<RecipeDetail>)> {
    validate_payload(&state.pool, &input).await?;

    let recipe = RecipeRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(recipe_id = recipe.id, user_id = auth.user_id, "Recipe created");

    let detail = load_detail(&state.pool, recipe.id, Some(auth.user_id)).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PATCH /api/recipes/{id}
///
/// Replace every field and link of a recipe. Author or admin only.
pub async fn update_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
    AppJson(input): AppJson<SaveRecipe>,
) -> AppResult<Json<RecipeDetail>> {
    let existing = find_recipe(&state.pool, recipe_id).await?;
    ensure_author_or_admin(existing.author_id, auth.user_id, &auth.role)?;
    validate_payload(&state.pool, &input).await?;

    RecipeRepo::update(&state.pool, recipe_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Recipe",
            id: recipe_id,
        })?;
    tracing::info!(recipe_id, user_id = auth.user_id, "Recipe updated");

    let detail = load_detail(&state.pool, recipe_id, Some(auth.user_id)).await?;
    Ok(Json(detail))
}

/// DELETE /api/recipes/{id}
///
/// Author or admin only. Links, favorites and cart rows cascade.
pub async fn delete_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_recipe(&state.pool, recipe_id).await?;
    ensure_author_or_admin(existing.author_id, auth.user_id, &auth.role)?;

    RecipeRepo::delete(&state.pool, recipe_id).await?;
    tracing::info!(recipe_id, user_id = auth.user_id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Favorites and shopping cart
// ---------------------------------------------------------------------------

/// POST /api/recipes/{id}/favorite
pub async fn add_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    add_recipe_membership(&state.pool, RelationKind::Favorite, auth.user_id, recipe_id).await
}

/// DELETE /api/recipes/{id}/favorite
pub async fn remove_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    remove_membership(&state.pool, RelationKind::Favorite, auth.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/shopping_cart
pub async fn add_to_cart(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    add_recipe_membership(&state.pool, RelationKind::Cart, auth.user_id, recipe_id).await
}

/// DELETE /api/recipes/{id}/shopping_cart
pub async fn remove_from_cart(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    remove_membership(&state.pool, RelationKind::Cart, auth.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/download_shopping_cart
///
/// Plain-text shopping list summed over every recipe in the caller's cart.
pub async fn download_shopping_cart(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = ShoppingListRepo::aggregate(&state.pool, auth.user_id).await?;
    let items: Vec<ShoppingListItem> = rows.into_iter().map(Into::into).collect();
    let body = shopping_list::render(&items);

    tracing::info!(user_id = auth.user_id, lines = items.len(), "Shopping list downloaded");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, shopping_list::content_disposition()),
        ],
        body,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn add_recipe_membership(
    pool: &PgPool,
    kind: RelationKind,
    user_id: DbId,
    recipe_id: DbId,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    add_membership(pool, kind, user_id, recipe_id).await?;
    let recipe = RecipeRepo::find_short(pool, recipe_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Recipe",
            id: recipe_id,
        })?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn find_recipe(pool: &PgPool, recipe_id: DbId) -> AppResult<Recipe> {
    RecipeRepo::find_by_id(pool, recipe_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id: recipe_id,
        }))
}

async fn load_detail(
    pool: &PgPool,
    recipe_id: DbId,
    viewer: Option<DbId>,
) -> AppResult<RecipeDetail> {
    RecipeRepo::find_detail(pool, recipe_id, viewer)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id: recipe_id,
        }))
}

/// Field rules first, then existence of every referenced tag and ingredient.
async fn validate_payload(pool: &PgPool, input: &SaveRecipe) -> AppResult<()> {
    validate_recipe(&input.fields())?;

    let found_tags = TagRepo::existing_ids(pool, &input.tags).await?;
    ensure_all_exist("tags", "Tag", &missing_ids(&input.tags, &found_tags))?;

    let ingredient_ids: Vec<DbId> = input.ingredients.iter().map(|i| i.id).collect();
    let found_ingredients = IngredientRepo::existing_ids(pool, &ingredient_ids).await?;
    ensure_all_exist(
        "ingredients",
        "Ingredient",
        &missing_ids(&ingredient_ids, &found_ingredients),
    )?;

    Ok(())
}
