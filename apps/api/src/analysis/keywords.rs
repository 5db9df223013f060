use std::collections::BTreeSet;

use super::tokenizer::tokenize;

/// Distinct job-description words that never appear in the resume, sorted.
pub fn missing_keywords(job_text: &str, resume_text: &str) -> Vec<String> {
    let job_words = token_set(job_text);
    let resume_words = token_set(resume_text);
    job_words.difference(&resume_words).cloned().collect()
}

fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_difference_is_sorted() {
        assert_eq!(missing_keywords("python sql aws", "python java"), vec!["aws", "sql"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(missing_keywords("aws aws, sql aws", ""), vec!["aws", "sql"]);
    }

    #[test]
    fn test_self_match_has_no_gap() {
        for text in ["", "rust", "senior rust engineer, remote (eu)", "a b c a"] {
            assert!(missing_keywords(text, text).is_empty(), "gap for {text:?}");
        }
    }

    #[test]
    fn test_punctuation_does_not_create_gaps() {
        assert!(missing_keywords("rust, python.", "python rust").is_empty());
    }

    #[test]
    fn test_byte_order_sorting() {
        assert_eq!(missing_keywords("b a 10 2 _x", ""), vec!["10", "2", "_x", "a", "b"]);
    }
}
