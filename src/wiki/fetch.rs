// src/wiki/fetch.rs
// =============================================================================
// This module downloads article pages.
//
// The search engine never talks to reqwest directly. It only knows the
// PageFetcher trait, which has one job: given an article, return its HTML or
// a FetchError. That gives us two implementations:
// - HttpFetcher: the real one, a shared reqwest Client
// - an in-memory fake wiki in the race tests (no network needed)
//
// Rust concepts:
// - Traits: an interface the controller is generic over
// - async-trait: lets a trait have async methods
// - Send + Sync: the fetcher is shared by many in-flight requests
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{FetchError, RaceError};
use crate::wiki::ArticleRef;

/// Fetches the raw HTML of an article.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, article: &ArticleRef) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP(S) with one pooled client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Parameters:
    //   timeout: per-request limit; a slow page becomes a FetchError
    //   user_agent: Wikimedia asks clients to identify themselves
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, RaceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, article: &ArticleRef) -> Result<String, FetchError> {
        let url = article.as_str();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| transport_error(url, e))
    }
}

// Keeps the timeout case readable in logs
fn transport_error(url: &str, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - Tests need pages without a network connection
//    - Racer<F: PageFetcher> works with anything that can produce HTML
//
// 2. Why #[async_trait]?
//    - It rewrites `async fn` in the trait into a boxed future so the trait
//      works the same on every supported compiler
//
// 3. Why one Client?
//    - reqwest::Client keeps a connection pool; reusing it means one TLS
//      handshake per host instead of one per page
// -----------------------------------------------------------------------------
