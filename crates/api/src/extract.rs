//! Request extractors that report failures through [`AppError`].
//!
//! Axum's stock `Json`, `Path` and `Query` reject with plain-text bodies;
//! these wrappers turn every rejection into the JSON error envelope.

use axum::extract::{FromRequest, FromRequestParts, OriginalUri, Query};
use axum::http::request::Parts;
use foodgram_core::error::CoreError;
use foodgram_core::pagination::PageRequest;
use serde::Serialize;

use crate::error::AppError;
use crate::response::Page;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Typed query string.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Raw query pairs plus the request location, for paginated list endpoints.
///
/// Pairs keep repeated keys (`?tags=a&tags=b`) in order. `path` and
/// `raw_query` are taken from the original URI so links stay correct when
/// the router is nested.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub pairs: Vec<(String, String)>,
    pub path: String,
    pub raw_query: Option<String>,
}

impl ListQuery {
    /// Paging parameters, using `default_limit` when `?limit=` is unusable.
    pub fn page_request(&self, default_limit: i64) -> Result<PageRequest, CoreError> {
        PageRequest::from_query(&self.pairs, default_limit)
    }

    /// Wrap one page of results with `count` and navigation links.
    pub fn page<T: Serialize>(
        &self,
        request: &PageRequest,
        count: i64,
        results: Vec<T>,
    ) -> Page<T> {
        let (next, previous) = request.links(&self.path, self.raw_query.as_deref(), count);
        Page {
            count,
            next,
            previous,
            results,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ListQuery {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;

        Ok(Self {
            pairs,
            path: uri.path().to_string(),
            raw_query: uri.query().map(str::to_string),
        })
    }
}
