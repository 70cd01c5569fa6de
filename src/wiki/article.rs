// src/wiki/article.rs
// =============================================================================
// ArticleRef: the identity of one wiki article.
//
// Two links point at the same article exactly when their normalized forms are
// equal. Normalizing means:
// - keep host and path, and always use the https scheme (the wiki serves
//   the same page on http and https)
// - drop the query string and the #fragment
// - let the url crate lower-case the host
//
// Only real articles are accepted. The path has to look like /wiki/<Title>
// and the title may not contain a colon, which is how the wiki marks its
// special namespaces (File:, Special:, Talk:, Help:, ...).
//
// Rust concepts:
// - Newtype pattern: a struct wrapping a String so the compiler can tell an
//   article apart from any other string
// - Derives: Hash + Eq make it usable as a HashMap/HashSet key
// =============================================================================

use std::fmt;

use percent_encoding::percent_decode_str;
use serde::Serialize;
use url::Url;

use crate::error::RaceError;

// Every article lives under this path prefix
const ARTICLE_PREFIX: &str = "/wiki/";

/// A normalized, absolute article URL such as
/// `https://en.wikipedia.org/wiki/Peace`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArticleRef(String);

impl ArticleRef {
    /// Parses and normalizes a user-supplied article URL.
    pub fn parse(raw: &str) -> Result<Self, RaceError> {
        let url = Url::parse(raw.trim()).map_err(|e| RaceError::InvalidArticle {
            input: raw.to_string(),
            reason: e.to_string(),
        })?;

        Self::from_url(&url).map_err(|reason| RaceError::InvalidArticle {
            input: raw.to_string(),
            reason: reason.to_string(),
        })
    }

    // Shared by parse() and the link extractor, which already holds a Url
    pub(crate) fn from_url(url: &Url) -> Result<Self, &'static str> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err("only http and https URLs are articles");
        }

        let host = url.host_str().ok_or("URL has no host")?;

        // A non-default port would put a second colon after the scheme
        if url.port().is_some() {
            return Err("article URLs may not carry an explicit port");
        }

        let path = url.path();
        let title = path
            .strip_prefix(ARTICLE_PREFIX)
            .ok_or("path does not start with /wiki/")?;

        if title.is_empty() {
            return Err("article title is empty");
        }

        // Namespaced pages, written either raw or percent-encoded
        if title.contains(':') || title.to_ascii_uppercase().contains("%3A") {
            return Err("namespaced pages (File:, Special:, ...) are not articles");
        }

        Ok(ArticleRef(format!("https://{}{}", host, path)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The wiki host, e.g. `en.wikipedia.org`. Articles on the same host
    /// are in the same language.
    pub fn host(&self) -> &str {
        // from_url always writes "https://<host>/wiki/..."
        let after_scheme = self.0.split_once("://").map(|(_, rest)| rest).unwrap_or(&self.0);
        after_scheme.split('/').next().unwrap_or(after_scheme)
    }

    /// Human-readable title: percent-decoded, underscores shown as spaces.
    pub fn title(&self) -> String {
        let raw = self
            .0
            .split_once(ARTICLE_PREFIX)
            .map(|(_, title)| title)
            .unwrap_or(&self.0);
        percent_decode_str(raw).decode_utf8_lossy().replace('_', " ")
    }
}

impl fmt::Display for ArticleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
