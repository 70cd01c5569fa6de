// src/wiki/mod.rs
// =============================================================================
// Everything the search needs to know about the wiki itself.
//
// Submodules:
// - article: ArticleRef, a normalized article URL
// - fetch: downloading a page (PageFetcher trait + HttpFetcher)
// - links: pulling article links out of a page's HTML
//
// The race module only uses what is re-exported here.
// =============================================================================

mod article;
mod fetch;
mod links;

pub use article::ArticleRef;
pub use fetch::{HttpFetcher, PageFetcher};
pub use links::LinkExtractor;
