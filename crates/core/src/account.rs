//! Account field rules shared by registration and profile lookups.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldErrors;

/// Maximum length of usernames and first/last names.
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum length of an email address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Letters, digits and `@ . + - _`.
pub const USERNAME_PATTERN: &str = r"^[\w.@+-]+$";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("valid regex"));

/// Usernames that would collide with fixed routes under `/users`.
const RESERVED_USERNAMES: &[&str] = &["me", "subscriptions", "set_password"];

/// Check a username against the allowed character set and reserved words.
///
/// Length limits are enforced by the request DTO; this covers the rules the
/// declarative validators cannot express.
pub fn validate_username(username: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !USERNAME_RE.is_match(username) {
        errors.add(
            "username",
            "Username may contain only letters, digits and @/./+/-/_ characters.",
        );
    }
    if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
        errors.add("username", format!("Username '{username}' is reserved."));
    }
    errors
}
