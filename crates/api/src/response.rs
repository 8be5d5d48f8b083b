//! Shared response types for API handlers.
//!
//! Single resources are returned as bare JSON objects. Paginated lists use
//! [`Page`]; unpaginated lists (tags, ingredients) are bare arrays.

use serde::Serialize;

/// Paginated list envelope: `{ count, next, previous, results }`.
///
/// `next` / `previous` are server-relative links (`/api/recipes?page=3`)
/// or `null` at either end. Build it with
/// [`ListQuery::page`](crate::extract::ListQuery::page).
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
