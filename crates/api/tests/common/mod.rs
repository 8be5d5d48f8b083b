#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use foodgram_api::auth::jwt::JwtConfig;
use foodgram_api::auth::password::hash_password;
use foodgram_api::config::ServerConfig;
use foodgram_api::router::build_app_router;
use foodgram_api::state::AppState;
use foodgram_db::models::user::{CreateUser, User};
use foodgram_db::repositories::UserRepo;

/// A 1x1 PNG as a data URI.
pub const TEST_IMAGE: &str = "data:image/png;base64,\
    iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhf\
    DwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Password used for every user created through these helpers.
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        page_size: 6,
        min_password_length: 8,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Token {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST with no body, as used by the membership endpoints.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the auth token.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> String {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/auth/token/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), 200, "login should succeed");
    body_json(response).await["auth_token"]
        .as_str()
        .expect("auth_token must be a string")
        .to_string()
}

/// Create a user with the given role and log them in.
pub async fn create_user_with_token(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = create_user(pool, username, role).await;
    let token = login(pool, &user.email, TEST_PASSWORD).await;
    (user, token)
}

/// Insert an ingredient and return its id.
pub async fn create_ingredient(pool: &PgPool, name: &str, unit: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(unit)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// A valid recipe payload with the given tag ids and `(ingredient id, amount)` pairs.
pub fn recipe_payload(name: &str, tags: &[i64], ingredients: &[(i64, i32)]) -> serde_json::Value {
    let ingredients: Vec<_> = ingredients
        .iter()
        .map(|(id, amount)| serde_json::json!({ "id": id, "amount": amount }))
        .collect();
    serde_json::json!({
        "ingredients": ingredients,
        "tags": tags,
        "image": TEST_IMAGE,
        "name": name,
        "text": "Mix everything and cook.",
        "cooking_time": 20,
    })
}

/// Create a recipe through the API and return its id.
pub async fn create_recipe(
    pool: &PgPool,
    token: &str,
    name: &str,
    tags: &[i64],
    ingredients: &[(i64, i32)],
) -> i64 {
    let app = build_test_app(pool.clone());
    let payload = recipe_payload(name, tags, ingredients);
    let response = post_json_auth(app, "/api/recipes", payload, token).await;
    assert_eq!(response.status(), 201, "recipe creation should succeed");
    body_json(response).await["id"].as_i64().unwrap()
}
