use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// Per-node bookkeeping for a single search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchEntry {
    /// Best known distance from the source.
    pub dist_from_s: f64,
    /// Straight-line estimate to the target, filled in on first discovery.
    pub dist_to_t: f64,
    /// Predecessor on the best known path.
    pub prev: Option<NodeId>,
}

impl Default for SearchEntry {
    fn default() -> Self {
        Self {
            dist_from_s: f64::INFINITY,
            dist_to_t: 0.0,
            prev: None,
        }
    }
}

/// Query-scoped search state keyed by node id.
///
/// Nodes never carry search fields; every search writes here instead, which
/// keeps the graph read-only and lets concurrent queries share it. Missing
/// entries read as [`SearchEntry::default`].
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    entries: HashMap<NodeId, SearchEntry>,
    finalized: HashSet<NodeId>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search fields recorded for `id`.
    pub fn entry(&self, id: NodeId) -> SearchEntry {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    /// Number of nodes touched by the last search.
    pub fn visited(&self) -> usize {
        self.entries.len()
    }

    /// Restore every touched node to its defaults.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.finalized.clear();
    }

    /// `true` when no node holds non-default search fields.
    pub fn is_pristine(&self) -> bool {
        self.finalized.is_empty()
            && self
                .entries
                .values()
                .all(|entry| *entry == SearchEntry::default())
    }

    fn entry_mut(&mut self, id: NodeId) -> &mut SearchEntry {
        self.entries.entry(id).or_default()
    }
}

/// How the frontier estimates remaining distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Straight-line distance to the target (A*).
    StraightLine,
    /// No estimate (plain Dijkstra).
    Zero,
}

/// Shortest path between two connected nodes using A*.
pub fn find_route_a_star(graph: &Graph, start: NodeId, goal: NodeId) -> Result<Vec<NodeId>> {
    let mut state = SearchState::new();
    let route = search(graph, start, goal, Heuristic::StraightLine, &mut state);
    state.reset();
    route
}

/// Shortest path between two connected nodes using Dijkstra's algorithm.
pub fn find_route_dijkstra(graph: &Graph, start: NodeId, goal: NodeId) -> Result<Vec<NodeId>> {
    let mut state = SearchState::new();
    let route = search(graph, start, goal, Heuristic::Zero, &mut state);
    state.reset();
    route
}

/// Run a best-first search from `start` to `goal`, recording bookkeeping in
/// `state`.
///
/// The frontier accepts duplicate entries for the same node; entries for
/// nodes that were already expanded are skipped when popped. The first pop of
/// `goal` ends the search. Callers own `state` and decide when to reset it.
pub fn search(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    state: &mut SearchState,
) -> Result<Vec<NodeId>> {
    if start == goal {
        return Ok(vec![start]);
    }

    let max_pops = graph.edge_count() * 2 + graph.node_count();
    let mut frontier = BinaryHeap::new();
    let mut pops = 0usize;

    {
        let entry = state.entry_mut(start);
        entry.dist_from_s = 0.0;
        entry.dist_to_t = estimate(graph, heuristic, start, goal);
        frontier.push(FrontierEntry::new(start, entry.dist_to_t));
    }

    while let Some(FrontierEntry { node, .. }) = frontier.pop() {
        pops += 1;
        if pops > max_pops {
            break;
        }
        if !state.finalized.insert(node) {
            continue;
        }
        if node == goal {
            debug!(
                start,
                goal,
                visited = state.visited(),
                pops,
                "route search reached goal"
            );
            return Ok(reconstruct_path(state, start, goal));
        }

        let base = state.entry(node).dist_from_s;
        for (next, _) in graph.neighbours(node) {
            if state.finalized.contains(&next) {
                continue;
            }
            let candidate = base + graph.distance(node, next);
            let entry = state.entry_mut(next);
            if entry.prev.is_none() && entry.dist_from_s.is_infinite() {
                entry.dist_to_t = estimate(graph, heuristic, next, goal);
            }
            if candidate < entry.dist_from_s {
                entry.dist_from_s = candidate;
                entry.prev = Some(node);
                frontier.push(FrontierEntry::new(next, candidate + entry.dist_to_t));
            }
        }
    }

    debug!(start, goal, visited = state.visited(), "route search exhausted frontier");
    Err(Error::RouteNotFound { start, goal })
}

fn estimate(graph: &Graph, heuristic: Heuristic, from: NodeId, goal: NodeId) -> f64 {
    match heuristic {
        Heuristic::StraightLine => graph.distance(from, goal),
        Heuristic::Zero => 0.0,
    }
}

fn reconstruct_path(state: &SearchState, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = state.entry(node).prev;
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: NodeId,
    priority: FloatOrd,
}

impl FrontierEntry {
    fn new(node: NodeId, priority: f64) -> Self {
        Self {
            node,
            priority: FloatOrd(priority),
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
