// src/error.rs
// =============================================================================
// Error types for the path search.
//
// There are two kinds of errors here:
// - FetchError: one article page could not be downloaded. The search treats
//   this as "that page has no links" and keeps going, so it never reaches
//   the caller.
// - RaceError: the search could not run at all (bad input, timeout, HTTP
//   client setup). These are returned to the caller.
//
// "No path found within max depth" is NOT an error. It is a normal result
// with an empty path (see race::RaceReport).
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - Enums with data: each variant carries the details needed for a message
// =============================================================================

use std::time::Duration;

use thiserror::Error;

/// Failure to download a single article page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a usable response (DNS, TLS, timeout,
    /// connection reset, unreadable body).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// Errors that stop a search before or while it runs.
#[derive(Debug, Error)]
pub enum RaceError {
    #[error("invalid article reference '{input}': {reason}")]
    InvalidArticle { input: String, reason: String },

    #[error("max depth must be at least 1 (got {0})")]
    InvalidDepth(usize),

    #[error("concurrency must be at least 1 (got {0})")]
    InvalidConcurrency(usize),

    /// Start and target live on different wikis (different languages).
    #[error("start is on {start_host} but target is on {target_host}")]
    HostMismatch {
        start_host: String,
        target_host: String,
    },

    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
