mod common;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_test_app, create_user, create_user_with_token, get_auth, post_auth,
    post_json, TEST_PASSWORD,
};
use foodgram_core::roles::ROLE_USER;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token(pool: PgPool) {
    let user = create_user(&pool, "cook", ROLE_USER).await;
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/auth/token/login",
        json!({ "email": user.email, "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(!json["auth_token"].as_str().unwrap().is_empty());

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sessions, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "cook", ROLE_USER).await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/auth/token/login",
        json!({ "email": user.email, "password": "not-the-password" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["errors"][0],
        "Unable to log in with provided credentials."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_unknown_email_looks_like_wrong_password(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/auth/token/login",
        json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["errors"][0],
        "Unable to log in with provided credentials."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_missing_field_is_bad_request(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/auth/token/login", json!({ "email": "a@b.c" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Token handling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_token(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;

    let response = get_auth(build_test_app(pool.clone()), "/api/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(build_test_app(pool.clone()), "/api/auth/token/logout", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool.clone()), "/api/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_keeps_other_sessions(pool: PgPool) {
    let (user, first) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let second = common::login(&pool, &user.email, TEST_PASSWORD).await;

    let response = post_auth(build_test_app(pool.clone()), "/api/auth/token/logout", &first).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool.clone()), "/api/users/me", &second).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_without_token_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/token/logout")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bearer_scheme_is_accepted(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "cook", ROLE_USER).await;
    let app = build_test_app(pool);

    let request = Request::builder()
        .uri("/api/users/me")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_rejected_even_on_public_routes(pool: PgPool) {
    let response = get_auth(build_test_app(pool.clone()), "/api/recipes", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = build_test_app(pool);
    let request = Request::builder()
        .uri("/api/recipes")
        .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
