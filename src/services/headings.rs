// src/services/headings.rs

//! Heading-associated content collection.
//!
//! Locates headings whose text contains a keyword and gathers the
//! content that follows them: list items from list containers and
//! sufficiently long paragraphs, walking forward through siblings until
//! the next heading. Pure functions over a parsed tree, independent of
//! any renderer.

use scraper::{ElementRef, Html, Selector};

use crate::utils::{collapse_whitespace, contains_ci};

/// Paragraphs shorter than this are treated as boilerplate and skipped.
const MIN_PARAGRAPH_LEN: usize = 20;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

fn is_heading(el: &ElementRef<'_>) -> bool {
    HEADING_TAGS.contains(&el.value().name())
}

/// Collect texts associated with headings matching any of `keywords`.
///
/// For every heading whose text contains a keyword (case-insensitive),
/// following siblings are scanned until the next heading; list-item and
/// paragraph texts are collected in encounter order. Duplicates are the
/// caller's concern.
pub fn heading_associated_texts(document: &Html, keywords: &[String]) -> Vec<String> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let heading_sel = Selector::parse("h1, h2, h3, h4, h5, h6").unwrap();
    let mut collected = Vec::new();

    for heading in document.select(&heading_sel) {
        let heading_text = collapse_whitespace(&heading.text().collect::<String>());
        if !keywords.iter().any(|k| contains_ci(&heading_text, k)) {
            continue;
        }
        collect_following_siblings(&heading, &mut collected);
    }

    collected
}

/// Walk the siblings after `heading` until the next heading, collecting
/// list items and long-enough paragraphs.
fn collect_following_siblings(heading: &ElementRef<'_>, out: &mut Vec<String>) {
    let li_sel = Selector::parse("li").unwrap();
    let p_sel = Selector::parse("p").unwrap();

    for node in heading.next_siblings() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if is_heading(&el) {
            break;
        }

        match el.value().name() {
            "ul" | "ol" => collect_list_items(&el, &li_sel, out),
            "p" => push_paragraph(&el, out),
            _ => {
                // Containers may nest the interesting content one level
                // down; gather both kinds in document order.
                collect_list_items(&el, &li_sel, out);
                for p in el.select(&p_sel) {
                    push_paragraph(&p, out);
                }
            }
        }
    }
}

fn collect_list_items(scope: &ElementRef<'_>, li_sel: &Selector, out: &mut Vec<String>) {
    for item in scope.select(li_sel) {
        let text = collapse_whitespace(&item.text().collect::<String>());
        if !text.is_empty() {
            out.push(text);
        }
    }
}

fn push_paragraph(el: &ElementRef<'_>, out: &mut Vec<String>) {
    let text = collapse_whitespace(&el.text().collect::<String>());
    if text.chars().count() > MIN_PARAGRAPH_LEN {
        out.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn collects_list_after_matching_heading() {
        let html = Html::parse_document(
            r#"
            <h2>Key Features</h2>
            <ul><li>Fast</li><li>Light</li></ul>
            <h2>Shipping</h2>
            <ul><li>Worldwide</li></ul>
        "#,
        );
        let texts = heading_associated_texts(&html, &keywords(&["features"]));
        assert_eq!(texts, vec!["Fast", "Light"]);
    }

    #[test]
    fn walk_stops_at_next_heading() {
        let html = Html::parse_document(
            r#"
            <h3>Benefits</h3>
            <ul><li>Saves time</li></ul>
            <h3>Unrelated</h3>
            <ul><li>Should not appear</li></ul>
        "#,
        );
        let texts = heading_associated_texts(&html, &keywords(&["benefit"]));
        assert_eq!(texts, vec!["Saves time"]);
    }

    #[test]
    fn short_paragraphs_are_skipped() {
        let html = Html::parse_document(
            r#"
            <h2>Applications</h2>
            <p>Too short.</p>
            <p>This paragraph is comfortably longer than the threshold.</p>
        "#,
        );
        let texts = heading_associated_texts(&html, &keywords(&["application"]));
        assert_eq!(
            texts,
            vec!["This paragraph is comfortably longer than the threshold."]
        );
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let html = Html::parse_document(
            r#"
            <h2>TECHNICAL SPECIFICATIONS</h2>
            <ul><li>Weight: 2kg</li></ul>
        "#,
        );
        let texts = heading_associated_texts(&html, &keywords(&["specification"]));
        assert_eq!(texts, vec!["Weight: 2kg"]);
    }

    #[test]
    fn nested_lists_inside_containers_are_found() {
        let html = Html::parse_document(
            r#"
            <h2>Features</h2>
            <div class="wrap"><ul><li>Sealed housing</li></ul></div>
        "#,
        );
        let texts = heading_associated_texts(&html, &keywords(&["feature"]));
        assert_eq!(texts, vec!["Sealed housing"]);
    }

    #[test]
    fn no_matching_heading_yields_nothing() {
        let html = Html::parse_document("<h2>Care</h2><ul><li>Wipe clean</li></ul>");
        assert!(heading_associated_texts(&html, &keywords(&["feature"])).is_empty());
    }
}
