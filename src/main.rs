// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr so --json output stays clean)
// 3. Dispatch to the subcommand handler
// 4. Print the report and exit with a meaningful code:
//    0 = path found, 1 = no path within max depth, 2 = error
//
// Everything that prints lives here. The search itself (race/) only returns
// a RaceReport and never writes to the terminal.
// =============================================================================

mod cli;
mod config;
mod error;
mod race;
mod wiki;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use cli::{Cli, Commands};
use config::RaceConfig;
use race::{RaceReport, Racer, SearchStats};
use wiki::{ArticleRef, HttpFetcher, LinkExtractor, PageFetcher};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Race {
            start,
            target,
            max_depth,
            concurrency,
            timeout_secs,
            fetch_timeout_secs,
            user_agent,
            json,
            output,
        } => {
            let config = RaceConfig {
                concurrency,
                fetch_timeout: Duration::from_secs(fetch_timeout_secs),
                search_timeout: timeout_secs.map(Duration::from_secs),
                user_agent,
            };
            handle_race(&start, &target, max_depth, config, json, output.as_deref()).await
        }
        Commands::Links {
            article,
            fetch_timeout_secs,
            user_agent,
            json,
        } => handle_links(&article, Duration::from_secs(fetch_timeout_secs), &user_agent, json).await,
    }
}

// -v raises the level to DEBUG, -q lowers it to WARN
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Handles the 'race' subcommand
async fn handle_race(
    start: &str,
    target: &str,
    max_depth: usize,
    config: RaceConfig,
    json: bool,
    output: Option<&Path>,
) -> Result<i32> {
    // Bad input is reported before any request goes out
    let start = ArticleRef::parse(start)?;
    let target = ArticleRef::parse(target)?;

    let fetcher = HttpFetcher::new(config.fetch_timeout, &config.user_agent)?;
    let racer = Racer::new(fetcher, config)?;

    if !json {
        println!("🏁 Racing from '{}' to '{}'", start.title(), target.title());
        println!("📊 Max depth: {}\n", max_depth);
    }

    let report = racer.find_path(&start, &target, max_depth).await?;

    if let Some(path) = output {
        write_path_file(path, &report)?;
    }

    print_report(&report, json)?;

    if report.is_found() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Handles the 'links' subcommand
async fn handle_links(article: &str, timeout: Duration, user_agent: &str, json: bool) -> Result<i32> {
    let article = ArticleRef::parse(article)?;
    let extractor = LinkExtractor::for_article(&article)?;
    let fetcher = HttpFetcher::new(timeout, user_agent)?;

    let html = fetcher.fetch(&article).await?;
    let links = extractor.extract_article_links(&html);

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        println!("🔗 {} article link(s) to {} on '{}'", links.len(), extractor.host(), article.title());
        for link in &links {
            println!("   {}", link);
        }
    }

    Ok(0)
}

fn print_report(report: &RaceReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let seconds = report.stats.elapsed_ms as f64 / 1000.0;

    match report.hops() {
        Some(hops) => {
            println!("✅ Found a path of {} link(s) in {:.2}s:", hops, seconds);
            for (step, article) in report.path.iter().enumerate() {
                println!("   {:>2}. {:<40} {}", step, article.title(), article);
            }
            println!();
            println!("ℹ️  Shortest among the links explored in this search;");
            println!("   pages that were never fetched could hold a shorter route.");
        }
        None => {
            println!(
                "❌ No path found within max depth {} ({:.2}s)",
                report.max_depth, seconds
            );
        }
    }

    println!();
    print_stats(&report.stats);
    Ok(())
}

fn print_stats(stats: &SearchStats) {
    println!("📊 Summary:");
    println!("   📄 Pages fetched: {}", stats.articles_expanded);
    println!("   ⚠️  Failed fetches: {}", stats.fetch_failures);
    println!("   🔁 Levels completed: {}", stats.levels_completed);
    println!("   🕸️  Graph: {} articles, {} links", stats.graph_nodes, stats.graph_edges);
}

// One URL per line; an empty file means no path was found
fn write_path_file(path: &Path, report: &RaceReport) -> Result<()> {
    let mut contents = String::new();
    for article in &report.path {
        contents.push_str(article.as_str());
        contents.push('\n');
    }

    std::fs::write(path, contents)
        .with_context(|| format!("could not write path to {}", path.display()))
}
