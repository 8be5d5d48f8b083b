//! Page-number pagination (`?page=&limit=`).
//!
//! List endpoints answer with `{count, next, previous, results}`. This module
//! parses the paging parameters and builds the `next` / `previous` links from
//! the request path and raw query string.

use crate::error::{CoreError, FieldErrors};

/// Default page size when `?limit=` is absent or unusable.
pub const DEFAULT_PAGE_SIZE: i64 = 6;

/// Upper bound for `?limit=`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Largest page number whose row range fits in `i64` at any allowed limit.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

pub const PAGE_PARAM: &str = "page";
pub const LIMIT_PARAM: &str = "limit";

/// Parsed paging parameters. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Read `page` and `limit` from decoded query pairs.
    ///
    /// A missing page means page 1; a page that is not a positive integer,
    /// or is past [`MAX_PAGE`], is an [`CoreError::InvalidPage`]. A limit
    /// that is missing, non-numeric or not positive falls back to
    /// `default_limit`; larger limits are capped at [`MAX_PAGE_SIZE`].
    pub fn from_query(pairs: &[(String, String)], default_limit: i64) -> Result<Self, CoreError> {
        let page = match last_value(pairs, PAGE_PARAM) {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(p) if (1..=MAX_PAGE).contains(&p) => p,
                _ => return Err(CoreError::InvalidPage(raw.to_string())),
            },
        };

        let limit = last_value(pairs, LIMIT_PARAM)
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(MAX_PAGE_SIZE);

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Page 1 always exists (possibly empty); later pages must start
    /// inside the result set.
    pub fn ensure_in_range(&self, count: i64) -> Result<(), CoreError> {
        if self.page > 1 && self.offset() >= count {
            return Err(CoreError::InvalidPage(self.page.to_string()));
        }
        Ok(())
    }

    pub fn has_next(&self, count: i64) -> bool {
        self.offset() + self.limit < count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// `(next, previous)` links for a result set of `count` rows.
    pub fn links(
        &self,
        path: &str,
        raw_query: Option<&str>,
        count: i64,
    ) -> (Option<String>, Option<String>) {
        let next = self
            .has_next(count)
            .then(|| page_link(path, raw_query, self.page + 1));
        let previous = self
            .has_previous()
            .then(|| page_link(path, raw_query, self.page - 1));
        (next, previous)
    }
}

/// Rebuild `path?query` with the `page` parameter replaced.
///
/// Page 1 is expressed by dropping the parameter. Other parameters are kept
/// verbatim and in their original order.
pub fn page_link(path: &str, raw_query: Option<&str>, page: i64) -> String {
    let mut parts: Vec<String> = raw_query
        .unwrap_or("")
        .split('&')
        .filter(|part| !part.is_empty())
        .filter(|part| part.split('=').next() != Some(PAGE_PARAM))
        .map(str::to_string)
        .collect();

    if page > 1 {
        parts.push(format!("{PAGE_PARAM}={page}"));
    }

    if parts.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", parts.join("&"))
    }
}

/// Parse `?recipes_limit=`. Absent means "all recipes".
///
/// Only non-negative integers are accepted.
pub fn parse_recipes_limit(raw: Option<&str>) -> Result<Option<i64>, CoreError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidFields(FieldErrors::single(
            "recipes_limit",
            "Must be a non-negative integer.",
        )));
    }
    raw.parse::<i64>().map(Some).map_err(|_| {
        CoreError::InvalidFields(FieldErrors::single("recipes_limit", "Value is too large."))
    })
}

/// Last value given for `key`, matching how repeated scalar params resolve.
pub fn last_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
