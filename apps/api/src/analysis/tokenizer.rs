use std::sync::LazyLock;

use regex::Regex;

/// Anything that is neither a word character (Unicode letter, digit, `_`) nor whitespace.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"));

/// Splits `text` into word tokens after stripping punctuation.
///
/// No case folding, stemming or stop-word removal happens here; callers hand in
/// text that is already lower-cased.
pub fn tokenize(text: &str) -> Vec<String> {
    PUNCTUATION
        .replace_all(text, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_splits() {
        assert_eq!(tokenize("C++ is great, right?"), vec!["C", "is", "great", "right"]);
        assert_eq!(
            tokenize("c++ is great, right?"),
            vec!["c", "is", "great", "right"]
        );
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ").is_empty());
        assert!(tokenize("!!! ... ???").is_empty());
    }

    #[test]
    fn test_keeps_digits_underscores_and_unicode_letters() {
        assert_eq!(
            tokenize("node_js 5+ years, café-owner"),
            vec!["node_js", "5", "years", "caféowner"]
        );
    }

    #[test]
    fn test_punctuation_joins_rather_than_splits() {
        assert_eq!(tokenize("ci/cd e-mail"), vec!["cicd", "email"]);
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        assert_eq!(tokenize("sql\nrust sql"), vec!["sql", "rust", "sql"]);
    }
}
