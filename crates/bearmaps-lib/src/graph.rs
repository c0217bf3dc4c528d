use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use strsim::jaro_winkler;
use tracing::{info, warn};

use crate::geo::Position;
use crate::spatial::SpatialIndex;
use crate::trie::Trie;

/// Numeric identifier for a map node.
pub type NodeId = i64;

/// Numeric identifier for a way (road segment).
pub type WayId = i64;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

/// A point of the road network.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    /// Optional human-readable name carried by the node.
    pub name: Option<String>,
    adjacency: HashMap<NodeId, WayId>,
}

impl Node {
    fn new(id: NodeId, lon: f64, lat: f64) -> Self {
        Self {
            id,
            position: Position::new(lon, lat),
            name: None,
            adjacency: HashMap::new(),
        }
    }

    pub fn lon(&self) -> f64 {
        self.position.lon
    }

    pub fn lat(&self) -> f64 {
        self.position.lat
    }

    /// Way connecting this node to `neighbour`, if they are adjacent.
    pub fn way_to(&self, neighbour: NodeId) -> Option<WayId> {
        self.adjacency.get(&neighbour).copied()
    }
}

/// A named road segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: WayId,
    /// Display name; empty when the extract does not name the way.
    pub name: String,
    /// Member nodes in way order.
    pub nodes: Vec<NodeId>,
}

/// Named point returned by exact location lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: NodeId,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

/// Mutable construction phase of the road graph.
///
/// The parser feeds elements through `add_node`, `add_edge`, `add_location`
/// and `add_connected_node_id`; [`GraphBuilder::build`] then freezes the
/// data into a read-only [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: HashMap<NodeId, Node>,
    ways: HashMap<WayId, Way>,
    connected: HashSet<NodeId>,
    locations: Trie,
    edge_count: usize,
    skipped_edges: usize,
    skipped_locations: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Re-adding an id replaces its coordinates.
    pub fn add_node(&mut self, id: NodeId, lon: f64, lat: f64) {
        self.nodes
            .entry(id)
            .and_modify(|node| node.position = Position::new(lon, lat))
            .or_insert_with(|| Node::new(id, lon, lat));
    }

    /// Add a two-way edge between `from` and `to` belonging to `way_id`.
    ///
    /// Edges that reference unknown nodes are dropped.
    pub fn add_edge(&mut self, way_id: WayId, way_name: &str, from: NodeId, to: NodeId) {
        if !self.nodes.contains_key(&from) || !self.nodes.contains_key(&to) {
            self.skipped_edges += 1;
            return;
        }

        if let Some(node) = self.nodes.get_mut(&from) {
            node.adjacency.insert(to, way_id);
        }
        if let Some(node) = self.nodes.get_mut(&to) {
            node.adjacency.insert(from, way_id);
        }

        let way = self.ways.entry(way_id).or_insert_with(|| Way {
            id: way_id,
            name: String::new(),
            nodes: Vec::new(),
        });
        if !way_name.is_empty() {
            way.name = way_name.to_string();
        }
        if way.nodes.last() != Some(&from) {
            way.nodes.push(from);
        }
        way.nodes.push(to);
        self.edge_count += 1;
    }

    /// Attach a human-readable name to a node and index it for prefix search.
    pub fn add_location(&mut self, node_id: NodeId, name: &str) {
        let Some(node) = self.nodes.get_mut(&node_id) else {
            self.skipped_locations += 1;
            return;
        };
        node.name = Some(name.to_string());
        self.locations.add(name, node_id);
    }

    /// Mark a node as a member of a routable way.
    pub fn add_connected_node_id(&mut self, id: NodeId) {
        self.connected.insert(id);
    }

    /// Freeze the builder into an immutable graph.
    pub fn build(self) -> Graph {
        if self.skipped_edges > 0 {
            warn!(
                skipped_edges = self.skipped_edges,
                "ignored edges referencing unknown nodes"
            );
        }
        if self.skipped_locations > 0 {
            warn!(
                skipped_locations = self.skipped_locations,
                "ignored locations referencing unknown nodes"
            );
        }

        let connected: HashSet<NodeId> = self
            .connected
            .into_iter()
            .filter(|id| self.nodes.contains_key(id))
            .collect();

        let spatial = SpatialIndex::build(
            connected
                .iter()
                .filter_map(|id| self.nodes.get(id).map(|node| (*id, node.position))),
        );

        info!(
            nodes = self.nodes.len(),
            ways = self.ways.len(),
            edges = self.edge_count,
            connected = connected.len(),
            locations = self.locations.len(),
            "built road graph"
        );

        Graph {
            nodes: self.nodes,
            ways: self.ways,
            connected,
            locations: self.locations,
            spatial,
            edge_count: self.edge_count,
        }
    }
}

/// Read-only road graph shared by every query.
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    ways: HashMap<WayId, Way>,
    connected: HashSet<NodeId>,
    locations: Trie,
    spatial: SpatialIndex,
    edge_count: usize,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.len())
            .field("ways", &self.ways.len())
            .field("edges", &self.edge_count)
            .field("connected", &self.connected.len())
            .field("locations", &self.locations.len())
            .finish()
    }
}

impl Graph {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.nodes.get(&id).map(|node| node.position)
    }

    /// Neighbours of `id` paired with the way connecting them.
    pub fn neighbours(&self, id: NodeId) -> impl Iterator<Item = (NodeId, WayId)> + '_ {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|node| node.adjacency.iter().map(|(&n, &w)| (n, w)))
    }

    /// Way connecting two adjacent nodes.
    pub fn way_between(&self, from: NodeId, to: NodeId) -> Option<WayId> {
        self.nodes.get(&from).and_then(|node| node.way_to(to))
    }

    pub fn way(&self, id: WayId) -> Option<&Way> {
        self.ways.get(&id)
    }

    /// Raw display name of a way; empty for unnamed or unknown ways.
    pub fn way_name(&self, id: WayId) -> &str {
        self.ways.get(&id).map(|way| way.name.as_str()).unwrap_or("")
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges added during construction.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.connected.contains(&id)
    }

    /// Connected node closest to the given coordinate.
    ///
    /// Returns `None` only when the graph has no connected nodes. Ties
    /// between equidistant nodes are resolved arbitrarily.
    pub fn closest(&self, lon: f64, lat: f64) -> Option<NodeId> {
        self.spatial.nearest(Position::new(lon, lat))
    }

    /// Great-circle distance between two nodes in miles.
    ///
    /// Unknown ids yield `f64::INFINITY`.
    pub fn distance(&self, a: NodeId, b: NodeId) -> f64 {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.distance_to(&pb),
            _ => f64::INFINITY,
        }
    }

    /// Initial bearing from `a` to `b` in degrees, `[0, 360)`.
    ///
    /// Unknown ids yield `0.0`.
    pub fn bearing(&self, a: NodeId, b: NodeId) -> f64 {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.bearing_to(&pb),
            _ => 0.0,
        }
    }

    /// Location trie over named nodes.
    pub fn location_index(&self) -> &Trie {
        &self.locations
    }

    /// Full names of locations whose lowercase form starts with `prefix`.
    pub fn location_names(&self, prefix: &str) -> Option<Vec<String>> {
        self.locations.keys_with_prefix(prefix)
    }

    /// Every node registered under the exact (case-insensitive) name.
    pub fn locations(&self, name: &str) -> Vec<Location> {
        self.locations
            .get_location_ids(name)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| Location {
                id: node.id,
                name: node.name.clone().unwrap_or_default(),
                lon: node.lon(),
                lat: node.lat(),
            })
            .collect()
    }

    /// Location names similar to `name`, best match first.
    pub fn fuzzy_location_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, String)> = self
            .locations
            .keys_with_prefix("")
            .unwrap_or_default()
            .into_iter()
            .map(|candidate| (jaro_winkler(&needle, &candidate.to_lowercase()), candidate))
            .filter(|(score, _)| *score >= FUZZY_MATCH_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.truncate(limit);
        scored.into_iter().map(|(_, name)| name).collect()
    }
}
