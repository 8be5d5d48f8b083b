//! Tag color validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, FieldErrors};

/// Six hex digits with a leading `#`, either case.
pub const HEX_COLOR_PATTERN: &str = r"^#[0-9a-fA-F]{6}$";

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HEX_COLOR_PATTERN).expect("valid regex"));

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Reject any color that is not `#RRGGBB`.
pub fn validate_hex_color(value: &str) -> Result<(), CoreError> {
    if is_hex_color(value) {
        return Ok(());
    }
    Err(CoreError::InvalidFields(FieldErrors::single(
        "color",
        format!("{value} is not a HEX code. Example: #FF0000 (red)."),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_upper_and_lower_case() {
        assert!(is_hex_color("#FF0000"));
        assert!(is_hex_color("#00bfff"));
        assert!(is_hex_color("#F39c12"));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["FF0000", "#FF000", "#FF00000", "#GG0000", "", "#", " #FF0000", "red"] {
            assert!(validate_hex_color(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn error_is_keyed_by_color() {
        let err = validate_hex_color("blue").unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.get("color").is_some());
    }
}
