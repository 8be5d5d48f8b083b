use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foodgram_core::error::{CoreError, FieldErrors};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
///
/// ```text
/// { "error": "...", "code": "VALIDATION_ERROR", "fields": { "name": ["..."] } }
/// ```
///
/// `fields` is present only for 400 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `foodgram_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A malformed request (unparsable body, path or query).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Everything needed to render one error response.
struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Option<FieldErrors>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: None,
        }
    }

    fn validation(message: impl Into<String>, fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: message.into(),
            fields: Some(fields),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorBody::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::InvalidPage(page) => ErrorBody::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Invalid page: {page}"),
                ),
                CoreError::Validation(_) | CoreError::InvalidFields(_) => {
                    let fields = core.field_errors().unwrap_or_default();
                    ErrorBody::validation(fields.to_string(), fields)
                }
                CoreError::Unauthorized(msg) => {
                    ErrorBody::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => {
                    ErrorBody::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    ErrorBody::internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => ErrorBody {
                status: StatusCode::BAD_REQUEST,
                code: "BAD_REQUEST",
                message: msg.clone(),
                fields: Some(FieldErrors::non_field(msg.clone())),
            },
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorBody::internal()
            }
        };

        let mut json = json!({
            "error": body.message,
            "code": body.code,
        });
        if let Some(fields) = body.fields {
            json["fields"] = json!(fields);
        }

        (body.status, axum::Json(json)).into_response()
    }
}

/// Classify a sqlx error into a response body.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_*` constraints, foreign key violations and
///   CHECK violations map to 400; these are races or inputs the handlers
///   did not pre-validate.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorBody {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation.
                Some("23505") if constraint.starts_with("uq_") => Some(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                )),
                Some("23503") => Some(format!(
                    "Referenced object does not exist: {constraint}"
                )),
                Some("23514") => Some(format!("Value violates check constraint: {constraint}")),
                _ => None,
            };
            match message {
                Some(message) => {
                    tracing::debug!(constraint, "Constraint violation mapped to 400");
                    ErrorBody::validation(message.clone(), FieldErrors::non_field(message))
                }
                None => {
                    tracing::error!(error = %db_err, "Database error");
                    ErrorBody::internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorBody::internal()
        }
    }
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
