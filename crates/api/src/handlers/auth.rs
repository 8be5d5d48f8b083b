//! Handlers for the `/auth/token` resource (login, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{TimeZone, Utc};
use foodgram_core::error::CoreError;
use foodgram_db::models::session::CreateSession;
use foodgram_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Same message for unknown email and wrong password.
const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials.";

/// Request body for `POST /auth/token/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// POST /api/auth/token/login
///
/// Exchange email + password for an auth token. Each login opens a new
/// session so tokens can be revoked independently.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation(BAD_CREDENTIALS.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::Core(CoreError::Validation(BAD_CREDENTIALS.into())));
    }

    let (token, claims) = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| AppError::InternalError("Token expiry out of range".into()))?;
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_id: claims.jti,
            expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(TokenResponse { auth_token: token }))
}

/// POST /api/auth/token/logout
///
/// Revoke the presented token. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke(&state.pool, &auth.token_id).await?;
    tracing::info!(user_id = auth.user_id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
