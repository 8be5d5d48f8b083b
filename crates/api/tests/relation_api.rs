mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_ingredient, create_recipe, create_user_with_token,
    delete_auth, get_auth, post_auth,
};
use foodgram_core::roles::ROLE_USER;
use sqlx::PgPool;

const LUNCH: i64 = 2;

// ---------------------------------------------------------------------------
// Favorites and shopping cart
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn favorite_twice_is_rejected(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let potato = create_ingredient(&pool, "Potato", "kg").await;
    let id = create_recipe(&pool, &token, "Mash", &[LUNCH], &[(potato, 2)]).await;
    let uri = format!("/api/recipes/{id}/favorite");

    let response = post_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["name"], "Mash");
    assert_eq!(json["cooking_time"], 20);
    assert!(json.get("author").is_none());

    let response = post_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["errors"][0],
        "Recipe is already in favorites."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unfavorite_twice_is_rejected(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let potato = create_ingredient(&pool, "Potato", "kg").await;
    let id = create_recipe(&pool, &token, "Mash", &[LUNCH], &[(potato, 2)]).await;
    let uri = format!("/api/recipes/{id}/favorite");

    post_auth(build_test_app(pool.clone()), &uri, &token).await;

    let response = delete_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["errors"][0],
        "Recipe is not in favorites."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cart_membership_is_reflected_on_recipe(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let potato = create_ingredient(&pool, "Potato", "kg").await;
    let id = create_recipe(&pool, &token, "Mash", &[LUNCH], &[(potato, 2)]).await;
    let uri = format!("/api/recipes/{id}/shopping_cart");

    let response = post_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let detail = format!("/api/recipes/{id}");
    let response = get_auth(build_test_app(pool.clone()), &detail, &token).await;
    let json = body_json(response).await;
    assert_eq!(json["is_in_shopping_cart"], true);
    assert_eq!(json["is_favorited"], false);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool), &detail, &token).await;
    assert_eq!(body_json(response).await["is_in_shopping_cart"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn membership_on_missing_recipe_is_404(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;

    let response =
        post_auth(build_test_app(pool.clone()), "/api/recipes/999/favorite", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response =
        delete_auth(build_test_app(pool), "/api/recipes/999/shopping_cart", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn subscribe_returns_author_with_recipes(pool: PgPool) {
    let (author, author_token) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let (_, fan_token) = create_user_with_token(&pool, "fan", ROLE_USER).await;
    let potato = create_ingredient(&pool, "Potato", "kg").await;
    create_recipe(&pool, &author_token, "Mash", &[LUNCH], &[(potato, 2)]).await;
    let newest = create_recipe(&pool, &author_token, "Stew", &[LUNCH], &[(potato, 3)]).await;

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/users/{}/subscribe?recipes_limit=1", author.id),
        &fan_token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["id"], author.id);
    assert_eq!(json["username"], "cook");
    assert_eq!(json["is_subscribed"], true);
    assert_eq!(json["recipes_count"], 2);
    assert_eq!(json["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(json["recipes"][0]["id"], newest);

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/users/{}/subscribe", author.id),
        &fan_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/users/{}", author.id),
        &fan_token,
    )
    .await;
    assert_eq!(body_json(response).await["is_subscribed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn self_subscription_is_rejected(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;

    let response = post_auth(
        build_test_app(pool),
        &format!("/api/users/{}/subscribe", user.id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["errors"][0],
        "You cannot subscribe to yourself."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsubscribe_twice_is_rejected(pool: PgPool) {
    let (author, _) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let (_, fan_token) = create_user_with_token(&pool, "fan", ROLE_USER).await;
    let uri = format!("/api/users/{}/subscribe", author.id);

    let response = post_auth(build_test_app(pool.clone()), &uri, &fan_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &fan_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &fan_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["errors"][0],
        "You are not subscribed to this author."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subscribe_to_missing_user_is_404(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "fan", ROLE_USER).await;

    let response = post_auth(build_test_app(pool), "/api/users/9999/subscribe", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
