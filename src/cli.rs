// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - race:  find a shortest link path between two articles
// - links: show which article links the search would follow from one page
//
// Defaults come from config.rs so the CLI and the library agree on them.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{
    DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_DEPTH, DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "wiki-racer",
    version,
    about = "Find a shortest chain of links between two Wikipedia articles",
    long_about = "wiki-racer crawls Wikipedia breadth-first from a start article, building the \
                  link graph as it goes, and reports the shortest chain of article links that \
                  leads to the target article."
)]
pub struct Cli {
    /// Show debug logs (every fetched page)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors in the logs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find a shortest link path from START to TARGET
    ///
    /// Example: wiki-racer race https://en.wikipedia.org/wiki/Python_(programming_language) https://en.wikipedia.org/wiki/Peace
    Race {
        /// Article URL to start from
        start: String,

        /// Article URL to reach (must be on the same wiki as START)
        target: String,

        /// How many link levels to explore; 1 = only links on the start page
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// How many pages of one level may download at the same time
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Give up on the whole search after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Give up on a single page after this many seconds
        #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
        fetch_timeout_secs: u64,

        /// User-Agent header sent with every request
        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,

        /// Output the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also write the path to this file, one URL per line
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List the article links found on one page
    ///
    /// Example: wiki-racer links https://en.wikipedia.org/wiki/Peace
    Links {
        /// Article URL to inspect
        article: String,

        /// Give up after this many seconds
        #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
        fetch_timeout_secs: u64,

        /// User-Agent header sent with the request
        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,

        /// Output the links as a JSON array
        #[arg(long)]
        json: bool,
    },
}
