// src/render/mod.rs

//! Document rendering layer.
//!
//! A [`Renderer`] loads a URL and hands back a [`RenderedPage`] that can
//! be queried with CSS selectors. The crawl engine only ever talks to
//! this interface; [`HttpRenderer`] is the default reqwest-backed
//! implementation. Browser lifecycle, headers, and request filtering all
//! live behind this boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::NavigationPolicy;
use crate::utils::collapse_whitespace;

/// Parse a CSS selector string into a `Selector`.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// A loaded document, queryable by CSS selector.
///
/// Owns the parsed HTML tree together with the URL it was loaded from,
/// so relative links on the page can be resolved.
pub struct RenderedPage {
    url: String,
    document: Html,
}

impl RenderedPage {
    /// Build a page from raw HTML, as fetched from `url`.
    pub fn from_html(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    /// URL this page was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The parsed document tree.
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Collapsed text of the first element matching `selector`.
    ///
    /// Returns `None` when nothing matches or the match has no text.
    pub fn query_text(&self, selector: &Selector) -> Option<String> {
        self.document
            .select(selector)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .find(|text| !text.is_empty())
    }

    /// All elements matching `selector`, in document order.
    pub fn query_all<'a>(&'a self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.document.select(selector).collect()
    }

    /// Value of `attr` on the first matching element that carries it.
    pub fn query_attribute(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.document
            .select(selector)
            .find_map(|el| el.value().attr(attr))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Loads URLs into queryable pages.
///
/// `?Send` because the crawl is strictly sequential and parsed documents
/// are not `Send`.
#[async_trait(?Send)]
pub trait Renderer {
    /// Load `url` and return the rendered page. A single attempt; retry
    /// behavior belongs to the caller.
    async fn navigate(&self, url: &str, policy: &NavigationPolicy) -> Result<RenderedPage>;
}

/// Default renderer: plain HTTP fetch parsed with `scraper`.
pub struct HttpRenderer {
    client: Client,
    visual_debug: bool,
}

impl HttpRenderer {
    /// Create a renderer with the given identity string and default
    /// timeout. A profile's navigation policy can tighten the timeout
    /// per request.
    pub fn new(user_agent: &str, timeout_secs: u64, visual_debug: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            visual_debug,
        })
    }
}

#[async_trait(?Send)]
impl Renderer for HttpRenderer {
    async fn navigate(&self, url: &str, policy: &NavigationPolicy) -> Result<RenderedPage> {
        if self.visual_debug {
            log::info!("GET {url}");
        }

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(policy.timeout_secs))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::navigation(url, format!("HTTP status {status}")));
        }
        let body = response.text().await?;

        if policy.settle_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(policy.settle_delay_ms)).await;
        }

        let page = RenderedPage::from_html(url, &body);

        // A static fetch cannot wait for dynamic content; the presence
        // selector is only a readiness hint here.
        if let Some(presence) = &policy.presence_selector {
            if let Ok(selector) = parse_selector(presence) {
                if page.query_all(&selector).is_empty() {
                    log::debug!("Presence selector '{presence}' not found on {url}");
                }
            }
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
            <h1 class="title">  Widget   2000 </h1>
            <div class="empty"></div>
            <img class="hero" src="/img/widget.jpg" alt="Widget">
            <ul><li>One</li><li>Two</li></ul>
        </body></html>
    "#;

    #[test]
    fn query_text_collapses_whitespace() {
        let page = RenderedPage::from_html("https://example.com/p", FIXTURE);
        let sel = parse_selector(".title").unwrap();
        assert_eq!(page.query_text(&sel), Some("Widget 2000".to_string()));
    }

    #[test]
    fn query_text_skips_empty_matches() {
        let page = RenderedPage::from_html("https://example.com/p", FIXTURE);
        let sel = parse_selector(".empty").unwrap();
        assert_eq!(page.query_text(&sel), None);
    }

    #[test]
    fn query_attribute_returns_first_value() {
        let page = RenderedPage::from_html("https://example.com/p", FIXTURE);
        let sel = parse_selector("img.hero").unwrap();
        assert_eq!(
            page.query_attribute(&sel, "src"),
            Some("/img/widget.jpg".to_string())
        );
        assert_eq!(page.query_attribute(&sel, "data-zoom"), None);
    }

    #[test]
    fn query_all_preserves_document_order() {
        let page = RenderedPage::from_html("https://example.com/p", FIXTURE);
        let sel = parse_selector("li").unwrap();
        let texts: Vec<String> = page
            .query_all(&sel)
            .iter()
            .map(|el| el.text().collect())
            .collect();
        assert_eq!(texts, vec!["One", "Two"]);
    }

    #[test]
    fn parse_selector_rejects_garbage() {
        assert!(parse_selector("[[invalid").is_err());
        assert!(parse_selector("div.product > a[href]").is_ok());
    }
}
