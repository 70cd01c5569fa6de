// src/race/frontier.rs
// =============================================================================
// This module drives the search: a breadth-first crawl that builds the link
// graph as it goes and stops the moment the target shows up.
//
// How it works:
// 1. The frontier starts as just the start article
// 2. Every article in the frontier is fetched and its links extracted
// 3. Each link becomes an edge in the PathGraph; new articles are staged
//    for the next level
// 4. When a page links to the target, add that last edge and ask the graph
//    for the shortest path
// 5. Otherwise swap in the staged level and go one hop deeper, until the
//    frontier is empty or max_depth levels have been expanded
//
// Concurrency:
// - The pages of ONE level are fetched concurrently, at most `concurrency`
//   at a time (futures' buffered() stream)
// - Results come back in frontier order and are applied one by one by this
//   task, so the graph/visited/staged state needs no lock and the outcome
//   does not depend on which download finished first
// - Level N+1 is not started before level N is fully applied
// - Returning early drops the stream, which cancels any downloads still in
//   flight
//
// A page that fails to download counts as a page with no links: one broken
// page should not cost us a target that is reachable another way.
// =============================================================================

use std::collections::HashSet;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RaceConfig;
use crate::error::{FetchError, RaceError};
use crate::race::PathGraph;
use crate::wiki::{ArticleRef, LinkExtractor, PageFetcher};

/// Counters describing how much work a search did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    /// Pages fetched (successfully or not).
    pub articles_expanded: usize,
    /// Pages whose fetch failed and were treated as having no links.
    pub fetch_failures: usize,
    /// Depth levels fully expanded before the search ended.
    pub levels_completed: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub elapsed_ms: u64,
}

/// Outcome of one search.
///
/// An empty `path` means no path was found within the depth budget. A
/// non-empty path starts at `start`, ends at `target`, and is the shortest
/// one among the links seen during this search (not necessarily the
/// shortest on the whole wiki).
#[derive(Debug, Clone, Serialize)]
pub struct RaceReport {
    pub start: ArticleRef,
    pub target: ArticleRef,
    pub max_depth: usize,
    pub path: Vec<ArticleRef>,
    pub stats: SearchStats,
}

impl RaceReport {
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of links followed, or None when nothing was found.
    pub fn hops(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }
}

// Everything that changes while a search runs. Lives for one find_path call.
struct SearchState {
    graph: PathGraph,
    // Articles already expanded
    visited: HashSet<ArticleRef>,
    // Articles ever queued (visited + current level + next level)
    seen: HashSet<ArticleRef>,
    stats: SearchStats,
}

impl SearchState {
    fn new(start: &ArticleRef) -> Self {
        let mut seen = HashSet::new();
        seen.insert(start.clone());

        Self {
            graph: PathGraph::new(),
            visited: HashSet::new(),
            seen,
            stats: SearchStats::default(),
        }
    }

    fn finish(mut self, started: Instant) -> SearchStats {
        self.stats.graph_nodes = self.graph.node_count();
        self.stats.graph_edges = self.graph.edge_count();
        self.stats.elapsed_ms = started.elapsed().as_millis() as u64;
        self.stats
    }
}

/// The frontier controller.
pub struct Racer<F> {
    fetcher: F,
    config: RaceConfig,
}

impl<F: PageFetcher> Racer<F> {
    pub fn new(fetcher: F, config: RaceConfig) -> Result<Self, RaceError> {
        config.validate()?;
        Ok(Self { fetcher, config })
    }

    /// Finds a shortest link path from `start` to `target`, looking at most
    /// `max_depth` levels deep (1 = only the start page's links).
    ///
    /// Returns an error only for unusable input or when the configured
    /// search timeout expires. Not finding a path is a normal report with
    /// an empty path.
    pub async fn find_path(
        &self,
        start: &ArticleRef,
        target: &ArticleRef,
        max_depth: usize,
    ) -> Result<RaceReport, RaceError> {
        if max_depth == 0 {
            return Err(RaceError::InvalidDepth(max_depth));
        }
        if start.host() != target.host() {
            return Err(RaceError::HostMismatch {
                start_host: start.host().to_string(),
                target_host: target.host().to_string(),
            });
        }

        let extractor = LinkExtractor::for_article(start)?;
        let search = self.search(start, target, max_depth, &extractor);

        match self.config.search_timeout {
            Some(limit) => tokio::time::timeout(limit, search)
                .await
                .map_err(|_| RaceError::Timeout(limit)),
            None => Ok(search.await),
        }
    }

    async fn search(
        &self,
        start: &ArticleRef,
        target: &ArticleRef,
        max_depth: usize,
        extractor: &LinkExtractor,
    ) -> RaceReport {
        let started = Instant::now();
        let mut report = RaceReport {
            start: start.clone(),
            target: target.clone(),
            max_depth,
            path: Vec::new(),
            stats: SearchStats::default(),
        };

        // Nothing to fetch: the start already is the target
        if start == target {
            report.path = vec![start.clone()];
            report.stats.elapsed_ms = started.elapsed().as_millis() as u64;
            return report;
        }

        let mut state = SearchState::new(start);
        let mut frontier = vec![start.clone()];
        let mut depth = 0;

        while !frontier.is_empty() && depth < max_depth {
            info!(depth, articles = frontier.len(), "expanding level");

            match self
                .expand_level(frontier, &mut state, start, target, extractor)
                .await
            {
                LevelOutcome::Found(path) => {
                    info!(hops = path.len().saturating_sub(1), depth, "target reached");
                    report.path = path;
                    break;
                }
                LevelOutcome::Next(next) => {
                    frontier = next;
                    depth += 1;
                    state.stats.levels_completed = depth;
                }
            }
        }

        if !report.is_found() {
            info!(depth, "no path within max depth");
        }

        report.stats = state.finish(started);
        report
    }

    // Expands every article of one level. Takes the frontier by value and
    // hands back the next one, so no collection is shared between levels.
    async fn expand_level(
        &self,
        frontier: Vec<ArticleRef>,
        state: &mut SearchState,
        start: &ArticleRef,
        target: &ArticleRef,
        extractor: &LinkExtractor,
    ) -> LevelOutcome {
        // Enqueue-time dedup makes this a no-op in practice
        let pending: Vec<ArticleRef> = frontier
            .into_iter()
            .filter(|article| !state.visited.contains(article))
            .collect();

        let mut expansions = stream::iter(pending)
            .map(|article| self.expand(article, extractor))
            .buffered(self.config.concurrency);

        let mut next_level = Vec::new();

        while let Some((article, outcome)) = expansions.next().await {
            state.visited.insert(article.clone());
            state.stats.articles_expanded += 1;

            let links = match outcome {
                Ok(links) => links,
                Err(e) => {
                    warn!(article = %article, error = %e, "fetch failed, treating page as having no links");
                    state.stats.fetch_failures += 1;
                    Vec::new()
                }
            };

            debug!(article = %article, links = links.len(), "expanded");

            if links.contains(target) {
                state.graph.add_edge(&article, target);
                // Dropping `expansions` on return cancels the rest of the level
                let path = state.graph.shortest_path(start, target).unwrap_or_default();
                debug_assert!(path.windows(2).all(|hop| state.graph.has_edge(&hop[0], &hop[1])));
                return LevelOutcome::Found(path);
            }

            for link in links {
                if state.visited.contains(&link) {
                    continue;
                }
                state.graph.add_edge(&article, &link);

                if state.seen.insert(link.clone()) {
                    next_level.push(link);
                }
            }
        }

        LevelOutcome::Next(next_level)
    }

    // The only await point of an expansion is the download itself
    async fn expand(
        &self,
        article: ArticleRef,
        extractor: &LinkExtractor,
    ) -> (ArticleRef, Result<Vec<ArticleRef>, FetchError>) {
        let outcome = self
            .fetcher
            .fetch(&article)
            .await
            .map(|html| extractor.extract_article_links(&html));

        (article, outcome)
    }
}

enum LevelOutcome {
    Found(Vec<ArticleRef>),
    Next(Vec<ArticleRef>),
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why two collections (frontier and next_level) instead of one queue?
//    - A single VecDeque mixes depths together
//    - Here each level is a Vec that is moved into expand_level() and a new
//      Vec comes back, so "all of depth N before any of depth N+1" holds
//      by construction
//
// 2. buffered() vs buffer_unordered()
//    - Both run up to N futures at once
//    - buffer_unordered() yields results as they finish
//    - buffered() yields them in the order they were started
//    - We want the order: the first frontier article that links to the
//      target must win, no matter whose download was fastest
//
// 3. What happens to downloads still running when we return early?
//    - They live inside the stream; dropping the stream drops (cancels) them
//    - Nothing keeps running after find_path() returns
//
// 4. Why is `seen` separate from `visited`?
//    - visited = pages already expanded (no edges back to them)
//    - seen = pages already queued anywhere, so nobody is queued twice
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    const WIKI: &str = "https://en.wikipedia.org/wiki/";

    fn article(title: &str) -> ArticleRef {
        ArticleRef::parse(&format!("{}{}", WIKI, title)).unwrap()
    }

    fn titles(path: &[ArticleRef]) -> Vec<String> {
        path.iter().map(|a| a.title()).collect()
    }

    // In-memory wiki: each page is rendered as HTML from its link list.
    // Pages not in the table answer 404.
    struct FakeWiki {
        pages: HashMap<String, Vec<String>>,
        failing: HashSet<String>,
        delay: Option<Duration>,
        fetch_log: Arc<Mutex<Vec<String>>>,
    }

    impl FakeWiki {
        fn new(pages: &[(&str, &[&str])]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(page, links)| {
                        (page.to_string(), links.iter().map(|l| l.to_string()).collect())
                    })
                    .collect(),
                failing: HashSet::new(),
                delay: None,
                fetch_log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(mut self, page: &str) -> Self {
            self.failing.insert(page.to_string());
            self
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.fetch_log)
        }
    }

    #[async_trait]
    impl PageFetcher for FakeWiki {
        async fn fetch(&self, article: &ArticleRef) -> Result<String, FetchError> {
            let title = article.title();
            self.fetch_log.lock().unwrap().push(title.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.failing.contains(&title) {
                return Err(FetchError::Status {
                    url: article.to_string(),
                    status: 503,
                });
            }

            let links = self.pages.get(&title).ok_or_else(|| FetchError::Status {
                url: article.to_string(),
                status: 404,
            })?;

            let mut html = String::from("<html><body>");
            for link in links {
                html.push_str(&format!(r#"<p><a href="/wiki/{0}">{0}</a></p>"#, link));
            }
            html.push_str("</body></html>");
            Ok(html)
        }
    }

    fn racer(wiki: FakeWiki, concurrency: usize) -> Racer<FakeWiki> {
        let config = RaceConfig {
            concurrency,
            ..RaceConfig::default()
        };
        Racer::new(wiki, config).unwrap()
    }

    fn scenario_wiki() -> FakeWiki {
        FakeWiki::new(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["Target"]),
            ("D", &[]),
        ])
    }

    #[tokio::test]
    async fn test_finds_path_through_second_branch() {
        let wiki = scenario_wiki();
        let log = wiki.log();
        let racer = racer(wiki, 1);

        let report = racer.find_path(&article("A"), &article("Target"), 3).await.unwrap();

        assert_eq!(titles(&report.path), vec!["A", "C", "Target"]);
        assert_eq!(report.hops(), Some(2));
        assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C"]);
        assert_eq!(report.stats.articles_expanded, 3);
        assert_eq!(report.stats.levels_completed, 1);
    }

    #[tokio::test]
    async fn test_target_beyond_max_depth_is_not_found() {
        let wiki = scenario_wiki();
        let log = wiki.log();
        let racer = racer(wiki, 1);

        let report = racer.find_path(&article("A"), &article("Target"), 1).await.unwrap();

        assert!(report.path.is_empty());
        assert!(!report.is_found());
        assert_eq!(report.hops(), None);
        // Only the start page lies within one level
        assert_eq!(*log.lock().unwrap(), vec!["A"]);
        assert_eq!(report.stats.levels_completed, 1);
    }

    #[tokio::test]
    async fn test_start_equals_target() {
        let wiki = scenario_wiki();
        let log = wiki.log();
        let racer = racer(wiki, 1);

        let report = racer.find_path(&article("A"), &article("A"), 3).await.unwrap();

        assert_eq!(titles(&report.path), vec!["A"]);
        assert_eq!(report.hops(), Some(0));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_equal_paths_follow_frontier_order() {
        let first = FakeWiki::new(&[("A", &["B", "C"]), ("B", &["T"]), ("C", &["T"])]);
        let report = racer(first, 4).find_path(&article("A"), &article("T"), 3).await.unwrap();
        assert_eq!(titles(&report.path), vec!["A", "B", "T"]);

        // Same graph, links listed the other way round on the start page
        let swapped = FakeWiki::new(&[("A", &["C", "B"]), ("B", &["T"]), ("C", &["T"])]);
        let report = racer(swapped, 4).find_path(&article("A"), &article("T"), 3).await.unwrap();
        assert_eq!(titles(&report.path), vec!["A", "C", "T"]);
    }

    #[tokio::test]
    async fn test_result_is_reproducible_across_runs_and_pool_sizes() {
        let pages: &[(&str, &[&str])] = &[
            ("A", &["B", "C", "D"]),
            ("B", &["E", "F"]),
            ("C", &["F", "G"]),
            ("D", &["G"]),
            ("E", &["T"]),
            ("F", &["T"]),
            ("G", &["T"]),
        ];

        let expected = racer(FakeWiki::new(pages), 1)
            .find_path(&article("A"), &article("T"), 5)
            .await
            .unwrap()
            .path;

        for concurrency in [2, 3, 8] {
            for _ in 0..3 {
                let wiki = FakeWiki::new(pages).slow(Duration::from_millis(1));
                let report = racer(wiki, concurrency)
                    .find_path(&article("A"), &article("T"), 5)
                    .await
                    .unwrap();
                assert_eq!(report.path, expected);
            }
        }
        assert_eq!(titles(&expected), vec!["A", "B", "E", "T"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_abort_search() {
        let wiki = FakeWiki::new(&[
            ("A", &["B", "C"]),
            ("B", &["Target"]),
            ("C", &["E"]),
            ("E", &["Target"]),
        ])
        .failing("B");
        let racer = racer(wiki, 2);

        let report = racer.find_path(&article("A"), &article("Target"), 4).await.unwrap();

        // B would have been the shorter route, but its page is unavailable
        assert_eq!(titles(&report.path), vec!["A", "C", "E", "Target"]);
        assert_eq!(report.stats.fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_missing_pages_count_as_dead_ends() {
        // D is linked but has no page at all
        let wiki = FakeWiki::new(&[("A", &["D", "B"]), ("B", &["T"])]);
        let report = racer(wiki, 1).find_path(&article("A"), &article("T"), 3).await.unwrap();

        assert_eq!(titles(&report.path), vec!["A", "B", "T"]);
        assert_eq!(report.stats.fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_each_article_fetched_at_most_once() {
        // Diamond plus back links and a self link
        let wiki = FakeWiki::new(&[
            ("A", &["B", "C", "A"]),
            ("B", &["D", "A", "C"]),
            ("C", &["D", "B"]),
            ("D", &["A", "E"]),
            ("E", &["D"]),
        ]);
        let log = wiki.log();
        let racer = racer(wiki, 3);

        let report = racer.find_path(&article("A"), &article("Nowhere"), 10).await.unwrap();
        assert!(!report.is_found());

        let mut fetched = log.lock().unwrap().clone();
        let total = fetched.len();
        fetched.sort();
        fetched.dedup();
        assert_eq!(total, fetched.len());
        assert_eq!(fetched, vec!["A", "B", "C", "D", "E"]);
        // Frontier emptied after E, well before the depth budget
        assert_eq!(report.stats.levels_completed, 4);
    }

    #[tokio::test]
    async fn test_duplicate_links_on_one_page() {
        let wiki = FakeWiki::new(&[("A", &["B", "B", "C", "B"]), ("B", &["C", "C"]), ("C", &[])]);
        let log = wiki.log();
        let racer = racer(wiki, 1);

        let report = racer.find_path(&article("A"), &article("T"), 5).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C"]);
        // A-B, A-C, B-C
        assert_eq!(report.stats.graph_edges, 3);
        assert_eq!(report.stats.graph_nodes, 3);
    }

    #[tokio::test]
    async fn test_depth_bound_on_a_chain() {
        let pages: &[(&str, &[&str])] = &[("A", &["B"]), ("B", &["C"]), ("C", &["T"])];

        let wiki = FakeWiki::new(pages);
        let report = racer(wiki, 1).find_path(&article("A"), &article("T"), 3).await.unwrap();
        assert_eq!(titles(&report.path), vec!["A", "B", "C", "T"]);

        let wiki = FakeWiki::new(pages);
        let log = wiki.log();
        let report = racer(wiki, 1).find_path(&article("A"), &article("T"), 2).await.unwrap();
        assert!(!report.is_found());
        // C sits at depth 2 and is never expanded
        assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_path_follows_observed_links() {
        let pages: &[(&str, &[&str])] = &[
            ("A", &["B", "C"]),
            ("B", &["C", "D", "A"]),
            ("C", &["B", "E"]),
            ("D", &["F", "C"]),
            ("E", &["D", "F"]),
            ("F", &["T"]),
        ];
        let wiki = FakeWiki::new(pages);
        let links: HashMap<String, Vec<String>> = wiki.pages.clone();

        let report = racer(wiki, 2).find_path(&article("A"), &article("T"), 6).await.unwrap();
        let path = titles(&report.path);

        assert_eq!(path.first().map(String::as_str), Some("A"));
        assert_eq!(path.last().map(String::as_str), Some("T"));
        for pair in path.windows(2) {
            assert!(
                links[&pair[0]].contains(&pair[1]),
                "{} does not link to {}",
                pair[0],
                pair[1]
            );
        }
        // A -> B -> D -> F -> T is as short as it gets here
        assert_eq!(report.hops(), Some(4));
    }

    #[tokio::test]
    async fn test_http_start_reaches_https_target() {
        let wiki = FakeWiki::new(&[("A", &["Target"])]);
        let start = ArticleRef::parse("http://en.wikipedia.org/wiki/A").unwrap();
        let target = ArticleRef::parse("https://en.wikipedia.org/wiki/Target").unwrap();

        let report = racer(wiki, 1).find_path(&start, &target, 3).await.unwrap();

        assert_eq!(titles(&report.path), vec!["A", "Target"]);
        assert_eq!(report.stats.articles_expanded, 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_an_error() {
        let racer = racer(scenario_wiki(), 1);

        let result = racer.find_path(&article("A"), &article("Target"), 0).await;
        assert!(matches!(result, Err(RaceError::InvalidDepth(0))));

        let german = ArticleRef::parse("https://de.wikipedia.org/wiki/Ziel").unwrap();
        let result = racer.find_path(&article("A"), &german, 3).await;
        assert!(matches!(result, Err(RaceError::HostMismatch { .. })));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = RaceConfig {
            concurrency: 0,
            ..RaceConfig::default()
        };
        assert!(Racer::new(scenario_wiki(), config).is_err());
    }

    #[tokio::test]
    async fn test_search_timeout() {
        let wiki = scenario_wiki().slow(Duration::from_millis(500));
        let config = RaceConfig {
            concurrency: 1,
            search_timeout: Some(Duration::from_millis(20)),
            ..RaceConfig::default()
        };
        let racer = Racer::new(wiki, config).unwrap();

        let result = racer.find_path(&article("A"), &article("Target"), 3).await;
        assert!(matches!(result, Err(RaceError::Timeout(_))));
    }
}
