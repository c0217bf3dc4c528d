//! KD-tree index over connected nodes for nearest-node snapping.
//!
//! Positions are embedded on the unit sphere so that Euclidean (chord)
//! distance orders candidates exactly like great-circle distance. The closest
//! few candidates are then re-ranked with the haversine distance the rest of
//! the crate uses.

use std::collections::HashMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::geo::Position;
use crate::graph::NodeId;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Candidates fetched from the tree before haversine re-ranking.
const CANDIDATES: usize = 4;

/// Entry stored per distinct indexed position.
#[derive(Debug, Clone, Copy)]
struct IndexNode {
    node_id: NodeId,
    position: Position,
}

/// Nearest-neighbour index over a fixed set of node positions.
pub struct SpatialIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    nodes: Vec<IndexNode>,
}

impl SpatialIndex {
    /// Build an index from `(id, position)` pairs.
    ///
    /// Nodes sharing an identical coordinate collapse onto the smallest id,
    /// independent of input order; kiddo buckets cannot hold unbounded runs
    /// of equal split values.
    pub fn build(points: impl IntoIterator<Item = (NodeId, Position)>) -> Self {
        let mut nodes: Vec<IndexNode> = Vec::new();
        let mut seen: HashMap<(u64, u64), usize> = HashMap::new();
        let mut duplicates = 0usize;

        for (node_id, position) in points {
            let key = (position.lon.to_bits(), position.lat.to_bits());
            if let Some(&slot) = seen.get(&key) {
                duplicates += 1;
                let kept = &mut nodes[slot];
                kept.node_id = kept.node_id.min(node_id);
                continue;
            }
            seen.insert(key, nodes.len());
            nodes.push(IndexNode { node_id, position });
        }

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (index, node) in nodes.iter().enumerate() {
            tree.add(&node.position.unit_vector(), index);
        }

        debug!(
            indexed = nodes.len(),
            duplicates, "built connected-node spatial index"
        );

        Self { tree, nodes }
    }

    /// Number of indexed positions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Identifier of the indexed node closest to `target`, or `None` when the
    /// index is empty.
    pub fn nearest(&self, target: Position) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }

        let query = target.unit_vector();
        let candidates = self
            .tree
            .nearest_n::<SquaredEuclidean>(&query, CANDIDATES.min(self.nodes.len()));

        candidates
            .into_iter()
            .map(|neighbour| {
                let node = self.nodes[neighbour.item];
                (node.node_id, target.distance_to(&node.position))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }
}
