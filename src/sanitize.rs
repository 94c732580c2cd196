//! Username normalization applied before any query touches the store

use std::borrow::Cow;

/// Double every single quote so the value is safe inside a SQL string literal.
///
/// Statements are parameterized as well; this runs first regardless. The
/// sanitized form is what gets stored, so every operation must go through it
/// for lookups to match.
pub fn sanitize_username(raw: &str) -> Cow<'_, str> {
    if raw.contains('\'') {
        Cow::Owned(raw.replace('\'', "''"))
    } else {
        Cow::Borrowed(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_username_is_borrowed() {
        let out = sanitize_username("alice");
        assert!(matches!(out, Cow::Borrowed("alice")));
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(sanitize_username("o'brien"), "o''brien");
        assert_eq!(sanitize_username("'; DROP TABLE game_state; --"), "''; DROP TABLE game_state; --");
        assert_eq!(sanitize_username("''"), "''''");
    }

    #[test]
    fn test_total_over_odd_input() {
        assert_eq!(sanitize_username(""), "");
        assert_eq!(sanitize_username("\"double\""), "\"double\"");
        assert_eq!(sanitize_username("ünïcødé'"), "ünïcødé''");
    }
}
