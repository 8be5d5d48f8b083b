//! Route definitions for the `/ingredients` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::ingredients;
use crate::state::AppState;

/// Routes mounted at `/ingredients`.
///
/// ```text
/// GET    /        -> list_ingredients (?search=)
/// POST   /        -> create_ingredient (admin only)
/// GET    /{id}    -> get_ingredient
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(ingredients::list_ingredients).post(ingredients::create_ingredient),
        )
        .route("/{id}", get(ingredients::get_ingredient))
}
