// src/services/extractor.rs

//! Rule-based field extraction from a product page.
//!
//! Applies a profile's field rules to one rendered page and produces a
//! [`ProductRecord`]. Single-valued fields are first-match-wins over
//! their selector list; multi-valued fields union direct selector
//! matches with heading-associated content and dedupe by first
//! occurrence.

use std::collections::{BTreeMap, HashSet};

use crate::error::Result;
use crate::models::{MultiValuedRule, ProductRecord, SiteProfile};
use crate::render::{RenderedPage, parse_selector};
use crate::services::headings::heading_associated_texts;
use crate::utils::{
    clamp_sentences, collapse_whitespace, is_placeholder_image, product_id_from_url, resolve,
};

/// Attributes probed, in order, when resolving an image URL.
const IMAGE_ATTRS: [&str; 3] = ["src", "data-src", "content"];

/// Attributes probed, in order, when resolving a drawing link.
const LINK_ATTRS: [&str; 2] = ["href", "src"];

/// Extract one product record from a rendered page.
///
/// `fallback_title` is the candidate title from discovery, used when no
/// title selector matches. Faults are isolated by the caller: an error
/// here drops the candidate, never the crawl.
pub fn extract_record(
    page: &RenderedPage,
    url: &str,
    fallback_title: &str,
    profile: &SiteProfile,
) -> Result<ProductRecord> {
    let fields = &profile.fields;

    let title = first_text(page, &fields.title)
        .unwrap_or_else(|| collapse_whitespace(fallback_title));
    let description = first_text(page, &fields.description)
        .map(|text| clamp_sentences(&text))
        .unwrap_or_default();
    let image_url = first_url(page, &fields.image, &IMAGE_ATTRS, |u| {
        !is_placeholder_image(u)
    })
    .unwrap_or_default();
    let price = first_text(page, &fields.price);
    let drawing_url = first_url(page, &fields.drawing, &LINK_ATTRS, |_| true);

    let mut extra = BTreeMap::new();
    for (name, selectors) in &fields.custom {
        let values = dedupe_preserving_order(direct_matches(page, selectors));
        if !values.is_empty() {
            extra.insert(name.clone(), values);
        }
    }

    Ok(ProductRecord {
        product_id: product_id_from_url(url),
        title,
        description,
        image_url,
        url: url.to_string(),
        price,
        drawing_url,
        specifications: multi_valued(page, &fields.specifications),
        features: multi_valued(page, &fields.features),
        benefits: multi_valued(page, &fields.benefits),
        applications: multi_valued(page, &fields.applications),
        details: multi_valued(page, &fields.details),
        resources: multi_valued(page, &fields.resources),
        extra,
    })
}

/// First selector producing non-empty text wins; later selectors are
/// never consulted once one matches.
fn first_text(page: &RenderedPage, selectors: &[String]) -> Option<String> {
    for selector_str in selectors {
        let selector = match parse_selector(selector_str) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Skipping bad field selector: {e}");
                continue;
            }
        };
        if let Some(text) = page.query_text(&selector) {
            return Some(text);
        }
        // Meta tags carry their value in the content attribute.
        if let Some(content) = page.query_attribute(&selector, "content") {
            return Some(collapse_whitespace(&content));
        }
    }
    None
}

/// First selector resolving an acceptable absolute URL from any of
/// `attrs` wins. Matches whose URL fails `accept` (for images, a
/// placeholder asset) do not consume the selector.
fn first_url(
    page: &RenderedPage,
    selectors: &[String],
    attrs: &[&str],
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    for selector_str in selectors {
        let selector = match parse_selector(selector_str) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Skipping bad field selector: {e}");
                continue;
            }
        };
        for el in page.query_all(&selector) {
            for attr in attrs {
                let Some(value) = el.value().attr(attr) else {
                    continue;
                };
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                let url = resolve(page.url(), value);
                if accept(&url) {
                    return Some(url);
                }
            }
        }
    }
    None
}

/// Direct matches: every non-empty trimmed text of every selector, in
/// selector order.
fn direct_matches(page: &RenderedPage, selectors: &[String]) -> Vec<String> {
    let mut values = Vec::new();
    for selector_str in selectors {
        let selector = match parse_selector(selector_str) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Skipping bad field selector: {e}");
                continue;
            }
        };
        for el in page.query_all(&selector) {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                values.push(text);
            }
        }
    }
    values
}

/// Union of direct and heading-associated matches, deduplicated keeping
/// first occurrence. `None` when both derivations were empty.
fn multi_valued(page: &RenderedPage, rule: &MultiValuedRule) -> Option<Vec<String>> {
    if rule.is_empty() {
        return None;
    }
    let mut values = direct_matches(page, &rule.selectors);
    values.extend(heading_associated_texts(page.document(), &rule.keywords));

    let deduped = dedupe_preserving_order(values);
    if deduped.is_empty() { None } else { Some(deduped) }
}

fn dedupe_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
