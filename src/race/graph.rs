// src/race/graph.rs
// =============================================================================
// PathGraph: every link the search has actually seen, as an undirected graph.
//
// Each expansion "A links to B" becomes the edge A <-> B. Edges are only ever
// added, never removed, and only for links a fetched page really contained.
//
// Storage:
// - every article gets a compact NodeId (its position in `nodes`)
// - adjacency[id] lists neighbours in the order the edges were added
// - `edges` remembers which pairs exist, so a duplicate link is a no-op
//
// The shortest path query is a plain breadth-first search with parent
// pointers. All edges weigh one hop, so BFS is already optimal.
//
// The answer is the shortest path among the edges found SO FAR. The real
// wiki may have a shorter route through pages we never fetched.
// =============================================================================

use std::collections::{HashMap, HashSet, VecDeque};

use crate::wiki::ArticleRef;

type NodeId = usize;

/// Undirected, unweighted graph of discovered article links.
#[derive(Debug, Default)]
pub struct PathGraph {
    index: HashMap<ArticleRef, NodeId>,
    nodes: Vec<ArticleRef>,
    adjacency: Vec<Vec<NodeId>>,
    edges: HashSet<(NodeId, NodeId)>,
}

impl PathGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the undirected edge `a <-> b`.
    ///
    /// Returns false when the edge was already present (or `a == b`), in
    /// which case nothing changes.
    pub fn add_edge(&mut self, a: &ArticleRef, b: &ArticleRef) -> bool {
        if a == b {
            return false;
        }

        let a_id = self.intern(a);
        let b_id = self.intern(b);

        let key = (a_id.min(b_id), a_id.max(b_id));
        if !self.edges.insert(key) {
            return false;
        }

        self.adjacency[a_id].push(b_id);
        self.adjacency[b_id].push(a_id);
        true
    }

    pub fn has_edge(&self, a: &ArticleRef, b: &ArticleRef) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a_id), Some(&b_id)) => self.edges.contains(&(a_id.min(b_id), a_id.max(b_id))),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Finds a minimal-hop path from `start` to `target`.
    ///
    /// The first element is `start`, the last is `target`, and every
    /// consecutive pair is an edge of this graph. `start == target` gives the
    /// one-element path. Returns `None` when the two are not connected.
    ///
    /// Among several equally short paths the one found first wins, and
    /// neighbours are visited in edge-insertion order, so the same sequence
    /// of `add_edge` calls always yields the same path.
    pub fn shortest_path(&self, start: &ArticleRef, target: &ArticleRef) -> Option<Vec<ArticleRef>> {
        if start == target {
            return Some(vec![start.clone()]);
        }

        let start_id = *self.index.get(start)?;
        let target_id = *self.index.get(target)?;

        // parent[node] = the node we reached it from; start points at itself
        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut queue = VecDeque::new();

        parent.insert(start_id, start_id);
        queue.push_back(start_id);

        while let Some(current) = queue.pop_front() {
            for &next in &self.adjacency[current] {
                if parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, current);

                if next == target_id {
                    return Some(self.reconstruct(&parent, start_id, target_id));
                }

                queue.push_back(next);
            }
        }

        None
    }

    fn intern(&mut self, article: &ArticleRef) -> NodeId {
        if let Some(&id) = self.index.get(article) {
            return id;
        }

        let id = self.nodes.len();
        self.nodes.push(article.clone());
        self.adjacency.push(Vec::new());
        self.index.insert(article.clone(), id);
        id
    }

    // Walks parent pointers back from target, then flips the result
    fn reconstruct(
        &self,
        parent: &HashMap<NodeId, NodeId>,
        start: NodeId,
        target: NodeId,
    ) -> Vec<ArticleRef> {
        let mut path = vec![self.nodes[target].clone()];
        let mut current = target;

        while current != start {
            current = parent[&current];
            path.push(self.nodes[current].clone());
        }

        path.reverse();
        path
    }
}
