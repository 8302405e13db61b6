//! Text helpers shared by retrieval and formatting.

use unicode_segmentation::UnicodeSegmentation;

/// Returns the prefix of `s` holding at most `max` grapheme clusters.
///
/// Never splits a multi-byte character or a combining sequence.
#[must_use]
pub fn truncate_graphemes(s: &str, max: usize) -> &str {
    match s.grapheme_indices(true).nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Collapses runs of whitespace (including newlines) into single spaces.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("hello", 10, "hello" ; "shorter than max")]
    #[test_case("hello", 5, "hello" ; "exact length")]
    #[test_case("hello world", 5, "hello" ; "truncated")]
    #[test_case("", 3, "" ; "empty")]
    #[test_case("héllo", 2, "hé" ; "multibyte")]
    fn test_truncate_graphemes(input: &str, max: usize, expected: &str) {
        assert_eq!(truncate_graphemes(input, max), expected);
    }

    #[test]
    fn test_truncate_keeps_combining_sequence() {
        // "e" + combining acute accent is one grapheme
        let s = "e\u{301}abc";
        assert_eq!(truncate_graphemes(s, 1), "e\u{301}");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  Deep\n  learning\tfor\n\nall "),
            "Deep learning for all"
        );
    }
}
