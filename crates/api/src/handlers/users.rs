//! Handlers for the `/users` resource: registration, profiles, password
//! changes and subscriptions.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use foodgram_core::account::{validate_username, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH};
use foodgram_core::error::{CoreError, FieldErrors};
use foodgram_core::pagination::{last_value, parse_recipes_limit};
use foodgram_core::relation::RelationKind;
use foodgram_core::roles::ROLE_USER;
use foodgram_core::types::DbId;
use foodgram_db::models::user::{CreateUser, Subscription, UserProfile, UserResponse};
use foodgram_db::repositories::{RecipeRepo, UserRepo};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery, ListQuery};
use crate::handlers::membership::{add_membership, remove_membership};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

// `validator` length bounds are `u64`.
const MAX_EMAIL_LENGTH_U64: u64 = MAX_EMAIL_LENGTH as u64;
const MAX_NAME_LENGTH_U64: u64 = MAX_NAME_LENGTH as u64;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        email(message = "Enter a valid email address."),
        length(
            max = MAX_EMAIL_LENGTH_U64,
            message = "Ensure this field has no more than 254 characters."
        )
    )]
    pub email: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH_U64, message = "Must be 1 to 150 characters."))]
    pub username: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH_U64, message = "Must be 1 to 150 characters."))]
    pub first_name: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH_U64, message = "Must be 1 to 150 characters."))]
    pub last_name: String,
    pub password: String,
}

/// Request body for `POST /users/set_password`.
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Query parameters accepted by `POST /users/{id}/subscribe`.
#[derive(Debug, Deserialize)]
pub struct RecipesLimitParams {
    pub recipes_limit: Option<String>,
}

// ---------------------------------------------------------------------------
// Accounts and profiles
// ---------------------------------------------------------------------------

/// GET /api/users
///
/// Paginated list of all users with `is_subscribed` for the viewer.
pub async fn list_users(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    query: ListQuery,
) -> AppResult<Json<Page<UserProfile>>> {
    let page = query.page_request(state.config.page_size)?;
    let count = UserRepo::count(&state.pool).await?;
    page.ensure_in_range(count)?;

    let users =
        UserRepo::list_profiles(&state.pool, viewer.viewer(), page.limit, page.offset()).await?;
    Ok(Json(query.page(&page, count, users)))
}

/// POST /api/users
///
/// Register a new account. The password is never echoed back.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let mut errors: FieldErrors = input.validate().err().map(Into::into).unwrap_or_default();
    errors.merge(validate_username(&input.username));
    if let Err(problems) =
        validate_password_strength(&input.password, state.config.min_password_length)
    {
        for problem in problems {
            errors.add("password", problem);
        }
    }

    if UserRepo::find_by_username(&state.pool, &input.username).await?.is_some() {
        errors.add("username", "A user with that username already exists.");
    }
    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        errors.add("email", "A user with that email already exists.");
    }
    errors.into_result()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/users/{id}
pub async fn get_user(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    AppPath(user_id): AppPath<DbId>,
) -> AppResult<Json<UserProfile>> {
    let profile = find_profile(&state.pool, user_id, viewer.viewer()).await?;
    Ok(Json(profile))
}

/// GET /api/users/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserProfile>> {
    let profile = find_profile(&state.pool, auth.user_id, Some(auth.user_id)).await?;
    Ok(Json(profile))
}

/// POST /api/users/set_password
///
/// Change the caller's password. Returns 204 No Content.
pub async fn set_password(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    let mut errors = FieldErrors::new();
    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        errors.add("current_password", "Invalid password.");
    }
    if let Err(problems) =
        validate_password_strength(&input.new_password, state.config.min_password_length)
    {
        for problem in problems {
            errors.add("new_password", problem);
        }
    }
    errors.into_result()?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// GET /api/users/subscriptions?recipes_limit=
///
/// Paginated authors the caller follows, each with up to `recipes_limit`
/// of their newest recipes and their total recipe count.
pub async fn list_subscriptions(
    auth: AuthUser,
    State(state): State<AppState>,
    query: ListQuery,
) -> AppResult<Json<Page<Subscription>>> {
    let recipes_limit = parse_recipes_limit(last_value(&query.pairs, "recipes_limit"))?;
    let page = query.page_request(state.config.page_size)?;

    let count = UserRepo::count_followed(&state.pool, auth.user_id).await?;
    page.ensure_in_range(count)?;
    let authors =
        UserRepo::list_followed(&state.pool, auth.user_id, page.limit, page.offset()).await?;

    let subscriptions = build_subscriptions(&state.pool, authors, recipes_limit).await?;
    Ok(Json(query.page(&page, count, subscriptions)))
}

/// POST /api/users/{id}/subscribe
///
/// Follow an author. Returns 201 with the subscription representation.
pub async fn subscribe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(author_id): AppPath<DbId>,
    AppQuery(params): AppQuery<RecipesLimitParams>,
) -> AppResult<(StatusCode, Json<Subscription>)> {
    let recipes_limit = parse_recipes_limit(params.recipes_limit.as_deref())?;

    add_membership(&state.pool, RelationKind::Follow, auth.user_id, author_id).await?;

    let author = find_profile(&state.pool, author_id, Some(auth.user_id)).await?;
    let subscription = build_subscriptions(&state.pool, vec![author], recipes_limit)
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Subscription representation missing".into()))?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// DELETE /api/users/{id}/subscribe
pub async fn unsubscribe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(author_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    remove_membership(&state.pool, RelationKind::Follow, auth.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_profile(
    pool: &PgPool,
    user_id: DbId,
    viewer: Option<DbId>,
) -> AppResult<UserProfile> {
    UserRepo::find_profile(pool, user_id, viewer)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))
}

/// Attach recipe previews and counts to author profiles, keeping order.
async fn build_subscriptions(
    pool: &PgPool,
    authors: Vec<UserProfile>,
    recipes_limit: Option<i64>,
) -> AppResult<Vec<Subscription>> {
    let ids: Vec<DbId> = authors.iter().map(|a| a.id).collect();
    let mut previews = RecipeRepo::previews_by_authors(pool, &ids, recipes_limit).await?;
    let counts: HashMap<DbId, i64> = RecipeRepo::counts_by_authors(pool, &ids).await?;

    Ok(authors
        .into_iter()
        .map(|author| Subscription {
            recipes: previews.remove(&author.id).unwrap_or_default(),
            recipes_count: counts.get(&author.id).copied().unwrap_or(0),
            author,
        })
        .collect())
}
