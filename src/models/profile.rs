// src/models/profile.rs

//! Declarative per-site crawl profiles.
//!
//! A [`SiteProfile`] describes everything the engine needs to crawl one
//! catalog site: how listing pages paginate, how product links are
//! discovered, which selectors extract each record field, and which
//! records to keep. Profiles are loaded once per session and never
//! mutated.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Placeholder substituted with the page number in pagination templates.
const PAGE_PLACEHOLDER: &str = "{page}";

/// Declarative description of how to crawl one catalog site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Human-readable site name
    pub site_name: String,

    /// URL of the first listing page
    pub base_url: String,

    /// Listing URL template containing a `{page}` placeholder
    pub pagination_template: String,

    /// Product link discovery rules
    #[serde(default)]
    pub discovery: DiscoveryRules,

    /// Per-field extraction rules
    #[serde(default)]
    pub fields: FieldRules,

    /// Navigation retry/timeout policy
    #[serde(default)]
    pub navigation: NavigationPolicy,

    /// Record filter policy
    #[serde(default)]
    pub filter: FilterPolicy,
}

impl SiteProfile {
    /// Load a profile from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let profile: SiteProfile = serde_json::from_str(&content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Look up a built-in profile by name.
    pub fn builtin(name: &str) -> Option<Self> {
        builtin::profile(name)
    }

    /// Names of all built-in profiles.
    pub fn builtin_names() -> Vec<&'static str> {
        builtin::NAMES.to_vec()
    }

    /// Build the listing URL for a page number.
    ///
    /// Page 1 uses `base_url` verbatim; later pages substitute the page
    /// number into the pagination template.
    pub fn listing_url(&self, page: u32) -> String {
        if page <= 1 {
            self.base_url.clone()
        } else {
            self.pagination_template
                .replace(PAGE_PLACEHOLDER, &page.to_string())
        }
    }

    /// Validate profile values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site_name.trim().is_empty() {
            return Err(AppError::validation("site_name is empty"));
        }
        if !self.base_url.starts_with("http") {
            return Err(AppError::validation(format!(
                "base_url must be absolute: {}",
                self.base_url
            )));
        }
        if !self.pagination_template.contains(PAGE_PLACEHOLDER) {
            return Err(AppError::validation(format!(
                "pagination_template must contain {PAGE_PLACEHOLDER}"
            )));
        }
        if self.discovery.link_selectors.is_empty() {
            return Err(AppError::validation("discovery.link_selectors is empty"));
        }
        if self.navigation.max_retries == 0 {
            return Err(AppError::validation("navigation.max_retries must be > 0"));
        }
        if self.navigation.timeout_secs == 0 {
            return Err(AppError::validation("navigation.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Rules for discovering product links on a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRules {
    /// Selectors that scope link discovery to a listing container
    #[serde(default)]
    pub container_selectors: Vec<String>,

    /// Ordered link-selector strategies; the first with a match wins
    #[serde(default = "defaults::link_selectors")]
    pub link_selectors: Vec<String>,

    /// Ordered title selectors, evaluated relative to each matched link
    #[serde(default = "defaults::title_selectors")]
    pub title_selectors: Vec<String>,
}

impl Default for DiscoveryRules {
    fn default() -> Self {
        Self {
            container_selectors: Vec::new(),
            link_selectors: defaults::link_selectors(),
            title_selectors: defaults::title_selectors(),
        }
    }
}

/// Extraction rules for every record field.
///
/// Single-valued fields hold an ordered selector list evaluated
/// first-match-wins. Multi-valued fields combine direct selector matches
/// with heading-associated content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRules {
    /// Product title selectors
    #[serde(default = "defaults::field_title")]
    pub title: Vec<String>,

    /// Description selectors
    #[serde(default = "defaults::field_description")]
    pub description: Vec<String>,

    /// Main image selectors (resolved via src/data-src attributes)
    #[serde(default = "defaults::field_image")]
    pub image: Vec<String>,

    /// Price selectors
    #[serde(default)]
    pub price: Vec<String>,

    /// Technical drawing link selectors
    #[serde(default)]
    pub drawing: Vec<String>,

    /// Specification list rules
    #[serde(default = "defaults::rule_specifications")]
    pub specifications: MultiValuedRule,

    /// Feature list rules
    #[serde(default = "defaults::rule_features")]
    pub features: MultiValuedRule,

    /// Benefit list rules
    #[serde(default = "defaults::rule_benefits")]
    pub benefits: MultiValuedRule,

    /// Application list rules
    #[serde(default = "defaults::rule_applications")]
    pub applications: MultiValuedRule,

    /// Detail list rules
    #[serde(default = "defaults::rule_details")]
    pub details: MultiValuedRule,

    /// Resource/download list rules
    #[serde(default = "defaults::rule_resources")]
    pub resources: MultiValuedRule,

    /// Open-ended custom fields, extracted by direct selector match only
    #[serde(default)]
    pub custom: BTreeMap<String, Vec<String>>,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            title: defaults::field_title(),
            description: defaults::field_description(),
            image: defaults::field_image(),
            price: Vec::new(),
            drawing: Vec::new(),
            specifications: defaults::rule_specifications(),
            features: defaults::rule_features(),
            benefits: defaults::rule_benefits(),
            applications: defaults::rule_applications(),
            details: defaults::rule_details(),
            resources: defaults::rule_resources(),
            custom: BTreeMap::new(),
        }
    }
}

/// Rule for a multi-valued field: direct selectors plus heading keywords.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiValuedRule {
    /// Selectors whose matches are collected directly, in order
    #[serde(default)]
    pub selectors: Vec<String>,

    /// Keywords located in headings; content following a matching
    /// heading is collected until the next heading
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl MultiValuedRule {
    /// True when the rule can never produce content.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty() && self.keywords.is_empty()
    }
}

/// Navigation retry/timeout policy for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationPolicy {
    /// Selector expected to be present once the page is ready (advisory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_selector: Option<String>,

    /// Delay after navigation before the page is considered settled
    #[serde(default = "defaults::settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Maximum navigation attempts per URL
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            presence_selector: None,
            settle_delay_ms: defaults::settle_delay_ms(),
            max_retries: defaults::max_retries(),
            timeout_secs: defaults::timeout_secs(),
        }
    }
}

/// Policy for filtering discovered URLs and extracted records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterPolicy {
    /// URLs containing any of these substrings are skipped
    #[serde(default = "defaults::skip_url_substrings")]
    pub skip_url_substrings: Vec<String>,

    /// When non-empty, URLs must contain at least one of these
    #[serde(default)]
    pub required_url_substrings: Vec<String>,

    /// Minimum accepted description length
    #[serde(default = "defaults::min_description_length")]
    pub min_description_length: usize,

    /// Titles containing any of these (case-insensitive) are rejected
    #[serde(default = "defaults::blocked_title_keywords")]
    pub blocked_title_keywords: Vec<String>,

    /// Descriptions containing any of these (case-insensitive) are rejected
    #[serde(default)]
    pub blocked_description_keywords: Vec<String>,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            skip_url_substrings: defaults::skip_url_substrings(),
            required_url_substrings: Vec::new(),
            min_description_length: defaults::min_description_length(),
            blocked_title_keywords: defaults::blocked_title_keywords(),
            blocked_description_keywords: Vec::new(),
        }
    }
}

mod defaults {
    use super::MultiValuedRule;

    // Discovery defaults
    pub fn link_selectors() -> Vec<String> {
        vec![
            "a.product-link[href]".into(),
            ".product-card a[href]".into(),
            ".product a[href]".into(),
            "a[href*='/product']".into(),
        ]
    }
    pub fn title_selectors() -> Vec<String> {
        vec![
            ".product-title".into(),
            ".product-name".into(),
            "h2".into(),
            "h3".into(),
        ]
    }

    // Single-valued field defaults
    pub fn field_title() -> Vec<String> {
        vec!["h1".into(), ".product-title".into(), ".product-name".into()]
    }
    pub fn field_description() -> Vec<String> {
        vec![
            ".product-description".into(),
            ".description".into(),
            "meta[name='description']".into(),
        ]
    }
    pub fn field_image() -> Vec<String> {
        vec![
            ".product-image img".into(),
            ".gallery img".into(),
            "img.main-image".into(),
        ]
    }

    // Multi-valued field defaults: generic selectors plus the heading
    // keywords the field is named after.
    fn rule(selectors: &[&str], keywords: &[&str]) -> MultiValuedRule {
        MultiValuedRule {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
    pub fn rule_specifications() -> MultiValuedRule {
        rule(
            &[".specifications li", ".specs li", "table.specs td"],
            &["specification", "technical data"],
        )
    }
    pub fn rule_features() -> MultiValuedRule {
        rule(&[".features li"], &["feature"])
    }
    pub fn rule_benefits() -> MultiValuedRule {
        rule(&[".benefits li"], &["benefit", "advantage"])
    }
    pub fn rule_applications() -> MultiValuedRule {
        rule(&[".applications li"], &["application", "use case"])
    }
    pub fn rule_details() -> MultiValuedRule {
        rule(&[".details li"], &["detail"])
    }
    pub fn rule_resources() -> MultiValuedRule {
        rule(
            &[".resources a", ".downloads a"],
            &["resource", "download", "document"],
        )
    }

    // Navigation defaults
    pub fn settle_delay_ms() -> u64 {
        500
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn timeout_secs() -> u64 {
        30
    }

    // Filter defaults
    pub fn skip_url_substrings() -> Vec<String> {
        vec![
            "/cart".into(),
            "/login".into(),
            "/account".into(),
            "javascript:".into(),
            "#".into(),
        ]
    }
    pub fn min_description_length() -> usize {
        20
    }
    pub fn blocked_title_keywords() -> Vec<String> {
        vec!["404".into(), "not found".into(), "error".into()]
    }
}

mod builtin {
    use super::{DiscoveryRules, FieldRules, FilterPolicy, NavigationPolicy, SiteProfile};

    /// Names of the built-in profiles.
    pub const NAMES: &[&str] = &["books-demo", "woocommerce-generic"];

    /// Look up a built-in profile by name.
    pub fn profile(name: &str) -> Option<SiteProfile> {
        match name {
            "books-demo" => Some(books_demo()),
            "woocommerce-generic" => Some(woocommerce_generic()),
            _ => None,
        }
    }

    /// Profile for the public scraping sandbox at books.toscrape.com.
    fn books_demo() -> SiteProfile {
        SiteProfile {
            site_name: "Books to Scrape".to_string(),
            base_url: "https://books.toscrape.com/".to_string(),
            pagination_template: "https://books.toscrape.com/catalogue/page-{page}.html"
                .to_string(),
            discovery: DiscoveryRules {
                container_selectors: vec!["section ol.row".to_string()],
                link_selectors: vec!["article.product_pod h3 a".to_string()],
                title_selectors: Vec::new(),
            },
            fields: FieldRules {
                title: vec!["div.product_main h1".to_string()],
                description: vec!["#product_description ~ p".to_string()],
                image: vec!["#product_gallery img".to_string(), ".item.active img".to_string()],
                price: vec!["p.price_color".to_string()],
                ..FieldRules::default()
            },
            navigation: NavigationPolicy::default(),
            filter: FilterPolicy {
                min_description_length: 20,
                ..FilterPolicy::default()
            },
        }
    }

    /// Template profile matching stock WooCommerce markup; callers are
    /// expected to override the URLs for a concrete store.
    fn woocommerce_generic() -> SiteProfile {
        SiteProfile {
            site_name: "WooCommerce Store".to_string(),
            base_url: "https://example.com/shop/".to_string(),
            pagination_template: "https://example.com/shop/page/{page}/".to_string(),
            discovery: DiscoveryRules {
                container_selectors: vec!["ul.products".to_string()],
                link_selectors: vec![
                    "li.product a.woocommerce-LoopProduct-link".to_string(),
                    "li.product a[href]".to_string(),
                ],
                title_selectors: vec!["h2.woocommerce-loop-product__title".to_string()],
            },
            fields: FieldRules {
                title: vec!["h1.product_title".to_string()],
                description: vec![
                    ".woocommerce-product-details__short-description".to_string(),
                    "#tab-description p".to_string(),
                ],
                image: vec![".woocommerce-product-gallery img".to_string()],
                price: vec!["p.price".to_string()],
                ..FieldRules::default()
            },
            navigation: NavigationPolicy::default(),
            filter: FilterPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_profile() -> SiteProfile {
        SiteProfile {
            site_name: "Test".to_string(),
            base_url: "https://example.com/catalog".to_string(),
            pagination_template: "https://example.com/catalog?page={page}".to_string(),
            discovery: DiscoveryRules::default(),
            fields: FieldRules::default(),
            navigation: NavigationPolicy::default(),
            filter: FilterPolicy::default(),
        }
    }

    #[test]
    fn listing_url_page_one_is_base_url_verbatim() {
        let profile = minimal_profile();
        assert_eq!(profile.listing_url(1), "https://example.com/catalog");
    }

    #[test]
    fn listing_url_substitutes_page_number() {
        let profile = minimal_profile();
        assert_eq!(profile.listing_url(3), "https://example.com/catalog?page=3");
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let mut profile = minimal_profile();
        profile.pagination_template = "https://example.com/catalog?page=2".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let mut profile = minimal_profile();
        profile.base_url = "/catalog".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_link_selectors() {
        let mut profile = minimal_profile();
        profile.discovery.link_selectors.clear();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn builtin_profiles_are_valid() {
        for name in SiteProfile::builtin_names() {
            let profile = SiteProfile::builtin(name).unwrap();
            assert!(profile.validate().is_ok(), "builtin {name} invalid");
        }
    }

    #[test]
    fn builtin_unknown_name_is_none() {
        assert!(SiteProfile::builtin("no-such-site").is_none());
    }

    #[test]
    fn deserializes_minimal_json_with_defaults() {
        let json = r#"{
            "site_name": "Acme",
            "base_url": "https://acme.test/products",
            "pagination_template": "https://acme.test/products?page={page}",
            "fields": {
                "custom": { "warranty": [".warranty li"] }
            }
        }"#;
        let profile: SiteProfile = serde_json::from_str(json).unwrap();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.navigation.max_retries, 3);
        assert!(!profile.fields.title.is_empty());
        assert_eq!(profile.fields.custom["warranty"], vec![".warranty li"]);
    }
}
