// src/wiki/links.rs
// =============================================================================
// This module extracts article links from a wiki page.
//
// We use the `scraper` crate to:
// - Parse the HTML into a DOM
// - Find every <a href="..."> with a CSS selector
//
// and the `url` crate to:
// - Resolve relative links (/wiki/Peace) against the wiki's base URL
// - Throw away #fragments and ?queries
//
// Only links to articles on the SAME wiki host are kept. A page on
// en.wikipedia.org links to de.wikipedia.org, commons, external sites, edit
// pages and so on; none of those are steps in a race.
//
// The result keeps document order and has no duplicates. That order is the
// order articles get queued in, which makes the search reproducible.
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use crate::error::RaceError;
use crate::wiki::ArticleRef;

/// Pulls same-wiki article references out of page HTML.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    host: String,
    base: Url,
    anchors: Selector,
}

impl LinkExtractor {
    /// Creates an extractor for the wiki that `article` belongs to.
    pub fn for_article(article: &ArticleRef) -> Result<Self, RaceError> {
        let base = Url::parse(article.as_str()).map_err(|e| RaceError::InvalidArticle {
            input: article.to_string(),
            reason: e.to_string(),
        })?;

        // Constant selector, known to be valid
        let anchors = Selector::parse("a[href]").unwrap();

        Ok(Self {
            host: article.host().to_string(),
            base,
            anchors,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns every distinct article linked from `html`, in document order.
    pub fn extract_article_links(&self, html: &str) -> Vec<ArticleRef> {
        let document = Html::parse_document(html);

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&self.anchors) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let Some(article) = self.resolve_article(href) else {
                continue;
            };

            // Duplicate links on one page count once
            if seen.insert(article.clone()) {
                links.push(article);
            }
        }

        links
    }

    // Turns one href into an article on our host, or None
    fn resolve_article(&self, href: &str) -> Option<ArticleRef> {
        let href = href.trim();

        // Fragment-only links point back into the same page
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        // Relative, root-relative and protocol-relative links all resolve
        // against the base; absolute links replace it
        let mut url = self.base.join(href).ok()?;
        url.set_fragment(None);
        url.set_query(None);

        if url.host_str() != Some(self.host.as_str()) {
            return None;
        }

        ArticleRef::from_url(&url).ok()
    }
}
