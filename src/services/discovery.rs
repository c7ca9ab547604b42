// src/services/discovery.rs

//! Product link discovery.
//!
//! Applies a profile's discovery rules to a rendered listing page and
//! produces deduplicated (url, title) candidates. Link-selector
//! strategies are ordered: the first selector that matches anything on
//! the page fully preempts the rest, so alternative strategies never mix.

use std::collections::HashSet;

use scraper::ElementRef;

use crate::models::{Candidate, SiteProfile};
use crate::render::{RenderedPage, parse_selector};
use crate::utils::{collapse_whitespace, resolve};

/// Discover product candidates on a listing page.
///
/// Returns an empty vec when no link-selector strategy matches; that is
/// a normal outcome, not an error.
pub fn discover_links(page: &RenderedPage, profile: &SiteProfile) -> Vec<Candidate> {
    let links = match select_links(page, profile) {
        Some(links) => links,
        None => return Vec::new(),
    };

    let filter = &profile.filter;
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for (index, link) in links.iter().enumerate() {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let url = resolve(page.url(), href);

        if filter.skip_url_substrings.iter().any(|s| url.contains(s)) {
            continue;
        }
        if !filter.required_url_substrings.is_empty()
            && !filter.required_url_substrings.iter().any(|s| url.contains(s))
        {
            continue;
        }

        // Dedupe by URL, first occurrence keeps its title.
        if !seen.insert(url.clone()) {
            continue;
        }

        let title = resolve_title(link, &profile.discovery.title_selectors, index + 1);
        candidates.push(Candidate { url, title });
    }

    candidates
}

/// Run ordered link-selector strategies; the first with a match wins.
fn select_links<'a>(page: &'a RenderedPage, profile: &SiteProfile) -> Option<Vec<ElementRef<'a>>> {
    let scopes = container_scopes(page, profile);

    for selector_str in &profile.discovery.link_selectors {
        let selector = match parse_selector(selector_str) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Skipping bad link selector: {e}");
                continue;
            }
        };

        let links: Vec<ElementRef<'a>> = match &scopes {
            Some(containers) => containers
                .iter()
                .flat_map(|c| c.select(&selector))
                .collect(),
            None => page.query_all(&selector),
        };

        if !links.is_empty() {
            log::debug!(
                "Link strategy '{}' matched {} elements",
                selector_str,
                links.len()
            );
            return Some(links);
        }
    }
    None
}

/// Scope link queries to the first container selector with a match, when
/// containers are declared. Falls back to the whole document.
fn container_scopes<'a>(
    page: &'a RenderedPage,
    profile: &SiteProfile,
) -> Option<Vec<ElementRef<'a>>> {
    for selector_str in &profile.discovery.container_selectors {
        let selector = match parse_selector(selector_str) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Skipping bad container selector: {e}");
                continue;
            }
        };
        let containers = page.query_all(&selector);
        if !containers.is_empty() {
            return Some(containers);
        }
    }
    None
}

/// Resolve a candidate title from a matched link element.
///
/// Tries the profile's title selectors relative to the link, then the
/// link's own text, its `title` attribute, its `alt` attribute, and
/// finally a positional placeholder.
fn resolve_title(link: &ElementRef<'_>, title_selectors: &[String], position: usize) -> String {
    for selector_str in title_selectors {
        let Ok(selector) = parse_selector(selector_str) else {
            continue;
        };
        for el in link.select(&selector) {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                return text;
            }
        }
    }

    let own_text = collapse_whitespace(&link.text().collect::<String>());
    if !own_text.is_empty() {
        return own_text;
    }

    for attr in ["title", "alt"] {
        if let Some(value) = link.value().attr(attr) {
            let value = collapse_whitespace(value);
            if !value.is_empty() {
                return value;
            }
        }
    }

    format!("Product {position}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteProfile;

    fn profile_with(link_selectors: &[&str], title_selectors: &[&str]) -> SiteProfile {
        let mut profile = SiteProfile::builtin("woocommerce-generic").unwrap();
        profile.site_name = "Test".to_string();
        profile.base_url = "https://shop.test/catalog".to_string();
        profile.pagination_template = "https://shop.test/catalog?page={page}".to_string();
        profile.discovery.container_selectors = Vec::new();
        profile.discovery.link_selectors =
            link_selectors.iter().map(|s| s.to_string()).collect();
        profile.discovery.title_selectors =
            title_selectors.iter().map(|s| s.to_string()).collect();
        profile.filter.skip_url_substrings = Vec::new();
        profile.filter.required_url_substrings = Vec::new();
        profile
    }

    fn page(html: &str) -> RenderedPage {
        RenderedPage::from_html("https://shop.test/catalog", html)
    }

    #[test]
    fn first_matching_strategy_preempts_later_ones() {
        let html = r#"
            <a class="primary" href="/p/one">One</a>
            <a class="secondary" href="/p/two">Two</a>
        "#;
        let profile = profile_with(&["a.primary", "a.secondary"], &[]);
        let candidates = discover_links(&page(html), &profile);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://shop.test/p/one");
    }

    #[test]
    fn later_strategy_used_when_earlier_has_no_match() {
        let html = r#"<a class="secondary" href="/p/two">Two</a>"#;
        let profile = profile_with(&["a.primary", "a.secondary"], &[]);
        let candidates = discover_links(&page(html), &profile);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Two");
    }

    #[test]
    fn no_strategy_match_yields_empty_not_error() {
        let profile = profile_with(&["a.primary"], &[]);
        assert!(discover_links(&page("<p>no links</p>"), &profile).is_empty());
    }

    #[test]
    fn skip_and_required_substrings_filter_urls() {
        let html = r#"
            <a class="p" href="/products/widget">Widget</a>
            <a class="p" href="/products/widget/review">Review</a>
            <a class="p" href="/about">About</a>
        "#;
        let mut profile = profile_with(&["a.p"], &[]);
        profile.filter.skip_url_substrings = vec!["/review".to_string()];
        profile.filter.required_url_substrings = vec!["/products/".to_string()];
        let candidates = discover_links(&page(html), &profile);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://shop.test/products/widget");
    }

    #[test]
    fn dedupe_keeps_first_occurrence_title() {
        let html = r#"
            <a class="p" href="/p/one">First Title</a>
            <a class="p" href="/p/one">Second Title</a>
            <a class="p" href="/p/two">Other</a>
        "#;
        let profile = profile_with(&["a.p"], &[]);
        let candidates = discover_links(&page(html), &profile);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "First Title");
        assert_eq!(candidates[1].url, "https://shop.test/p/two");
    }

    #[test]
    fn title_fallback_chain() {
        let html = r#"
            <a class="p" href="/p/a"><span class="name">Named</span></a>
            <a class="p" href="/p/b">Own text</a>
            <a class="p" href="/p/c" title="From title attr"></a>
            <a class="p" href="/p/d" alt="From alt attr"></a>
            <a class="p" href="/p/e"></a>
        "#;
        let profile = profile_with(&["a.p"], &[".name"]);
        let titles: Vec<String> = discover_links(&page(html), &profile)
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Named",
                "Own text",
                "From title attr",
                "From alt attr",
                "Product 5",
            ]
        );
    }

    #[test]
    fn container_scope_limits_matches() {
        let html = r#"
            <div class="listing"><a class="p" href="/p/in">In</a></div>
            <div class="footer"><a class="p" href="/p/out">Out</a></div>
        "#;
        let mut profile = profile_with(&["a.p"], &[]);
        profile.discovery.container_selectors = vec!["div.listing".to_string()];
        let candidates = discover_links(&page(html), &profile);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "In");
    }

    #[test]
    fn titles_have_collapsed_whitespace() {
        let html = "<a class=\"p\" href=\"/p/a\">  Widget \n  2000  </a>";
        let profile = profile_with(&["a.p"], &[]);
        let candidates = discover_links(&page(html), &profile);
        assert_eq!(candidates[0].title, "Widget 2000");
    }
}
