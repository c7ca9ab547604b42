// src/utils/url.rs

//! URL manipulation utilities.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// # Examples
/// ```
/// use harvester::utils::url::resolve;
///
/// assert_eq!(
///     resolve("https://example.com/path/", "page.html"),
///     "https://example.com/path/page.html"
/// );
/// ```
pub fn resolve(base: &str, href: &str) -> String {
    match Url::parse(base) {
        Ok(base_url) => base_url
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        Err(_) => href.to_string(),
    }
}

/// Derive a stable product identifier from a product URL.
///
/// Takes the final non-empty path segment and strips every character
/// outside `[A-Za-z0-9_-]`.
pub fn product_id_from_url(url: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Not an absolute URL; treat everything before ? or # as the path.
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let last_segment = path
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or_default();

    strip.replace_all(last_segment, "").to_string()
}

/// Check whether an image URL is a placeholder rather than a real asset.
pub fn is_placeholder_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.starts_with("data:")
        || lower.contains("placeholder")
        || lower.contains("spacer")
        || lower.contains("blank")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("https://example.com/path/", "page.html"),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve("https://example.com/path/", "/root.html"),
            "https://example.com/root.html"
        );
        assert_eq!(
            resolve("https://example.com/path/", "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_product_id_from_url() {
        assert_eq!(
            product_id_from_url("https://example.com/products/widget-2000"),
            "widget-2000"
        );
        assert_eq!(
            product_id_from_url("https://example.com/products/widget-2000/"),
            "widget-2000"
        );
        assert_eq!(
            product_id_from_url("https://example.com/p/ACME%20Bolt_3?ref=home"),
            "ACME20Bolt_3"
        );
        assert_eq!(product_id_from_url("https://example.com/"), "");
    }

    #[test]
    fn test_is_placeholder_image() {
        assert!(is_placeholder_image("data:image/gif;base64,R0lGOD"));
        assert!(is_placeholder_image(
            "https://cdn.example.com/img/placeholder.png"
        ));
        assert!(!is_placeholder_image("https://cdn.example.com/img/hero.jpg"));
    }
}
