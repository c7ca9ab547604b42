// src/utils/text.rs

//! Text normalization helpers shared by discovery and extraction.

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive substring check.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Clamp a description to its first three sentences.
///
/// The text is split on sentence-terminal punctuation (`.`, `!`, `?`); at
/// most the first three sentences are kept, rejoined with `". "`, and a
/// trailing period is appended if absent. Text with fewer than two
/// sentences is returned unmodified.
pub fn clamp_sentences(text: &str) -> String {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.len() < 2 {
        return text.to_string();
    }

    let mut clamped = sentences
        .iter()
        .take(3)
        .copied()
        .collect::<Vec<_>>()
        .join(". ");
    if !clamped.ends_with('.') {
        clamped.push('.');
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("Widget 404 Not Found", "404"));
        assert!(contains_ci("Heavy-Duty FEATURES", "features"));
        assert!(!contains_ci("Widget", "gadget"));
    }

    #[test]
    fn test_clamp_sentences_keeps_first_three() {
        let text = "One fact. Two facts! Three facts? Four facts.";
        assert_eq!(clamp_sentences(text), "One fact. Two facts. Three facts.");
    }

    #[test]
    fn test_clamp_sentences_single_sentence_untouched() {
        assert_eq!(clamp_sentences("Just one sentence"), "Just one sentence");
        assert_eq!(clamp_sentences("Just one sentence."), "Just one sentence.");
    }

    #[test]
    fn test_clamp_sentences_two_sentences() {
        assert_eq!(
            clamp_sentences("First part. Second part"),
            "First part. Second part."
        );
    }
}
