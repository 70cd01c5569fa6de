// src/config.rs
// =============================================================================
// Search settings.
//
// RaceConfig collects the knobs that shape HOW a search runs (pool size,
// timeouts, user agent). How FAR it runs, the max depth, is an argument of
// each search. The CLI fills both in (see cli.rs); tests build them directly.
// validate() runs before any page is fetched, so bad settings are reported
// immediately.
// =============================================================================

use std::time::Duration;

use crate::error::RaceError;

/// How many link hops away from the start we look by default.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// How many pages of one depth level may be downloading at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Per-page download limit, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_USER_AGENT: &str =
    concat!("wiki-racer/", env!("CARGO_PKG_VERSION"), " (shortest link path finder)");

#[derive(Debug, Clone)]
pub struct RaceConfig {
    /// Size of the per-level fetch pool.
    pub concurrency: usize,
    /// Limit for a single page download.
    pub fetch_timeout: Duration,
    /// Limit for the whole search. None = bounded by depth only.
    pub search_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            search_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RaceConfig {
    pub fn validate(&self) -> Result<(), RaceError> {
        if self.concurrency == 0 {
            return Err(RaceError::InvalidConcurrency(self.concurrency));
        }
        Ok(())
    }
}
