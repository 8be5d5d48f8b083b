pub mod auth;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/token/login                         login (public)
/// /auth/token/logout                        logout (requires auth)
///
/// /tags                                     list (public), create (admin)
/// /tags/{id}                                get (public)
///
/// /ingredients                              search (public), create (admin)
/// /ingredients/{id}                         get (public)
///
/// /recipes                                  list (public), create (auth)
/// /recipes/download_shopping_cart           shopping list as text (auth)
/// /recipes/{id}                             get (public), update, delete (author/admin)
/// /recipes/{id}/favorite                    add, remove (auth)
/// /recipes/{id}/shopping_cart               add, remove (auth)
///
/// /users                                    list, register (public)
/// /users/me                                 current user (auth)
/// /users/set_password                       change password (auth)
/// /users/subscriptions                      followed authors (auth)
/// /users/{id}                               get (public)
/// /users/{id}/subscribe                     follow, unfollow (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tags", tags::router())
        .nest("/ingredients", ingredients::router())
        .nest("/recipes", recipes::router())
        .nest("/users", users::router())
}
