//! Handlers for the `/tags` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use foodgram_core::error::{CoreError, FieldErrors};
use foodgram_core::tag::validate_hex_color;
use foodgram_core::types::DbId;
use foodgram_db::models::tag::{CreateTag, Tag};
use foodgram_db::repositories::TagRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/tags
///
/// All tags, unpaginated.
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(tags))
}

/// GET /api/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    AppPath(tag_id): AppPath<DbId>,
) -> AppResult<Json<Tag>> {
    let tag = TagRepo::find_by_id(&state.pool, tag_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Tag",
            id: tag_id,
        })?;
    Ok(Json(tag))
}

/// POST /api/tags
///
/// Create a tag. Admin only.
pub async fn create_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let mut errors = FieldErrors::new();
    if input.name.trim().is_empty() {
        errors.add("name", "This field may not be blank.");
    }
    if input.slug.trim().is_empty() {
        errors.add("slug", "This field may not be blank.");
    }
    if let Err(CoreError::InvalidFields(color_errors)) = validate_hex_color(&input.color) {
        errors.merge(color_errors);
    }
    errors.into_result()?;

    let tag = TagRepo::create(&state.pool, &input).await?;

    tracing::info!(tag_id = tag.id, user_id = admin.user_id, slug = %tag.slug, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}
