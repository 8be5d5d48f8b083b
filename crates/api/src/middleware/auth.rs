//! Token authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use foodgram_core::error::CoreError;
use foodgram_core::types::DbId;
use foodgram_db::repositories::SessionRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Accepted `Authorization` schemes.
const TOKEN_SCHEMES: [&str; 2] = ["Token ", "Bearer "];

/// Authenticated user extracted from the `Authorization` header.
///
/// The token must carry a valid signature, must not be expired, and its
/// session must not have been revoked by logout.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
    /// The token's `jti`, used to revoke it on logout.
    pub token_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            ))
        })?;
        authenticate(token, state).await
    }
}

/// The requesting user on endpoints open to anonymous visitors.
///
/// No `Authorization` header yields `MaybeAuthUser(None)`. A header that is
/// present but invalid is still rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    /// The viewer id passed to repositories.
    pub fn viewer(&self) -> Option<DbId> {
        self.0.as_ref().map(|user| user.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(MaybeAuthUser(Some(authenticate(token, state).await?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

/// The raw token from the `Authorization` header, if the header is present.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = value.to_str().map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid Authorization header".into()))
    })?;

    TOKEN_SCHEMES
        .iter()
        .find_map(|scheme| header.strip_prefix(scheme))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Token <token>".into(),
            ))
        })
}

async fn authenticate(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    let session = SessionRepo::find_active(&state.pool, &claims.jti).await?;
    match session {
        Some(session) if session.user_id == claims.sub => Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            token_id: claims.jti,
        }),
        _ => Err(AppError::Core(CoreError::Unauthorized(
            "Token has been revoked".into(),
        ))),
    }
}
