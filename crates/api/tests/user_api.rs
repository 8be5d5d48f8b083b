mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_ingredient, create_recipe, create_user,
    create_user_with_token, get, get_auth, post_auth, post_json, post_json_auth, TEST_PASSWORD,
};
use foodgram_core::roles::ROLE_USER;
use serde_json::json;
use sqlx::PgPool;

fn registration(username: &str) -> serde_json::Value {
    json!({
        "email": format!("{username}@example.com"),
        "username": username,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "password": "kitchen-secret",
    })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_account_without_echoing_password(pool: PgPool) {
    let response = post_json(build_test_app(pool.clone()), "/api/users", registration("ada")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "ada");
    assert_eq!(json["email"], "ada@example.com");
    assert!(json["id"].is_i64());
    assert!(json.get("password").is_none());
    assert!(json.get("is_subscribed").is_none());

    let token = common::login(&pool, "ada@example.com", "kitchen-secret").await;
    assert!(!token.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_and_email_are_rejected(pool: PgPool) {
    create_user(&pool, "ada", ROLE_USER).await;

    let response = post_json(build_test_app(pool), "/api/users", registration("ada")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["username"].is_array());
    assert!(json["fields"]["email"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_registration_reports_every_field(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/users",
        json!({
            "email": "not-an-email",
            "username": "bad name!",
            "first_name": "",
            "last_name": "Lovelace",
            "password": "12345678",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let fields = &body_json(response).await["fields"];
    for key in ["email", "username", "first_name", "password"] {
        assert!(fields[key].is_array(), "{key} should have errors");
    }
    assert!(fields.get("last_name").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserved_username_is_rejected(pool: PgPool) {
    let response = post_json(build_test_app(pool), "/api/users", registration("me")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["username"].is_array());
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_current_user(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;

    let response = get_auth(build_test_app(pool.clone()), "/api/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], user.id);
    assert_eq!(json["username"], "cook");
    assert_eq!(json["is_subscribed"], false);

    let response = get(build_test_app(pool), "/api/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_are_listed_with_pagination(pool: PgPool) {
    for name in ["a1", "a2", "a3"] {
        create_user(&pool, name, ROLE_USER).await;
    }

    let response = get(build_test_app(pool.clone()), "/api/users?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 3);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["next"], "/api/users?limit=2&page=2");

    let response = get(build_test_app(pool.clone()), "/api/users/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Password
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_password_replaces_credentials(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/users/set_password",
        json!({ "current_password": TEST_PASSWORD, "new_password": "brand-new-pass" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/auth/token/login",
        json!({ "email": &user.email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let token = common::login(&pool, &user.email, "brand-new-pass").await;
    assert!(!token.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_password_checks_current_and_strength(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/users/set_password",
        json!({ "current_password": "wrong-password", "new_password": "short" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let fields = &body_json(response).await["fields"];
    assert_eq!(fields["current_password"][0], "Invalid password.");
    assert!(fields["new_password"].is_array());
}

// ---------------------------------------------------------------------------
// Subscriptions list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn subscriptions_list_followed_authors(pool: PgPool) {
    let (author, author_token) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let (_, fan_token) = create_user_with_token(&pool, "fan", ROLE_USER).await;
    create_user(&pool, "stranger", ROLE_USER).await;
    let potato = create_ingredient(&pool, "Potato", "kg").await;
    for name in ["Mash", "Stew", "Chips"] {
        create_recipe(&pool, &author_token, name, &[2], &[(potato, 1)]).await;
    }

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/users/{}/subscribe", author.id),
        &fan_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/users/subscriptions?recipes_limit=2",
        &fan_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    let entry = &json["results"][0];
    assert_eq!(entry["id"], author.id);
    assert_eq!(entry["is_subscribed"], true);
    assert_eq!(entry["recipes_count"], 3);
    assert_eq!(entry["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(entry["recipes"][0]["name"], "Chips");

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/users/subscriptions",
        &fan_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["results"][0]["recipes"].as_array().unwrap().len(), 3);

    let response = get_auth(
        build_test_app(pool),
        "/api/users/subscriptions?recipes_limit=abc",
        &fan_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["recipes_limit"].is_array());
}
