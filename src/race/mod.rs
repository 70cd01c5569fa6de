// src/race/mod.rs
// =============================================================================
// The path search itself.
//
// Submodules:
// - graph: PathGraph, the undirected graph of links seen so far, plus the
//   shortest path query
// - frontier: Racer, which crawls level by level and fills the graph
//
// Rust concepts:
// - pub use: callers write race::Racer instead of race::frontier::Racer
// =============================================================================

mod frontier;
mod graph;

pub use frontier::{RaceReport, Racer, SearchStats};
pub use graph::PathGraph;
