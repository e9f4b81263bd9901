//! Helpers for building well-formed filter text from arbitrary values.

use std::sync::LazyLock;

use regex::Regex;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{Alphabetic}_][\p{Alphabetic}\p{Nd}_]*$").expect("identifier pattern is valid")
});

/// Escapes text that will appear inside a quoted string literal.
///
/// ```
/// use sqlexpr::escape::escape_string_content;
///
/// assert_eq!(escape_string_content("O'Brien"), "O''Brien");
/// ```
pub fn escape_string_content(text: &str) -> String {
    text.replace('\'', "''")
}

/// Escapes text that will appear in a `like` pattern. The result still goes
/// inside a quoted literal, so it is string-escaped as well.
pub fn escape_like_content(text: &str) -> String {
    escape_string_content(text)
        .replace('%', "%%")
        .replace('_', "__")
}

/// True if `text` can be written verbatim as a property name.
pub fn is_valid_identifier(text: &str) -> bool {
    IDENTIFIER.is_match(text)
}
