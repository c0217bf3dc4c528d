use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::directions::{route_directions, NavigationDirection};
use crate::error::{Error, Result};
use crate::geo::Position;
use crate::graph::{Graph, NodeId};
use crate::path::{find_route_a_star, find_route_dijkstra};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// A* search guided by straight-line distance to the goal.
    #[default]
    #[serde(rename = "a-star")]
    AStar,
    /// Dijkstra's algorithm without a heuristic.
    Dijkstra,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::AStar => "a-star",
            RouteAlgorithm::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "a-star" | "astar" | "a_star" => Ok(RouteAlgorithm::AStar),
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            other => Err(format!("unknown routing algorithm '{other}'")),
        }
    }
}

/// High-level route planning request between two coordinates.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: Position,
    pub goal: Position,
    pub algorithm: RouteAlgorithm,
}

impl RouteRequest {
    /// Convenience constructor for A* routes.
    pub fn a_star(start: Position, goal: Position) -> Self {
        Self {
            start,
            goal,
            algorithm: RouteAlgorithm::AStar,
        }
    }
}

/// Node visited by a planned route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteStep {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub start: NodeId,
    pub goal: NodeId,
    pub steps: Vec<RouteStep>,
    /// Sum of hop distances in miles.
    pub total_distance: f64,
    pub directions: Vec<NavigationDirection>,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Node ids along the route.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.steps.iter().map(|step| step.id).collect()
    }
}

/// Shortest path between the connected nodes nearest to two coordinates.
///
/// Returns node ids from the snapped start to the snapped destination,
/// inclusive; a single id when both snap to the same node.
pub fn shortest_path(
    graph: &Graph,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> Result<Vec<NodeId>> {
    let start = graph.closest(start_lon, start_lat).ok_or(Error::EmptyGraph)?;
    let goal = graph.closest(dest_lon, dest_lat).ok_or(Error::EmptyGraph)?;
    find_route_a_star(graph, start, goal)
}

/// Snap, search and describe a route in one call.
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
    let start = graph
        .closest(request.start.lon, request.start.lat)
        .ok_or(Error::EmptyGraph)?;
    let goal = graph
        .closest(request.goal.lon, request.goal.lat)
        .ok_or(Error::EmptyGraph)?;
    debug!(start, goal, algorithm = %request.algorithm, "planning route");

    let route = match request.algorithm {
        RouteAlgorithm::AStar => find_route_a_star(graph, start, goal)?,
        RouteAlgorithm::Dijkstra => find_route_dijkstra(graph, start, goal)?,
    };

    let total_distance = route
        .windows(2)
        .map(|pair| graph.distance(pair[0], pair[1]))
        .sum();
    let steps = route
        .iter()
        .filter_map(|&id| {
            graph.position(id).map(|position| RouteStep {
                id,
                lon: position.lon,
                lat: position.lat,
            })
        })
        .collect();
    let directions = route_directions(graph, &route);

    Ok(RoutePlan {
        algorithm: request.algorithm,
        start,
        goal,
        steps,
        total_distance,
        directions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn algorithm_parses_aliases() {
        assert_eq!("a-star".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::AStar));
        assert_eq!("AStar".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::AStar));
        assert_eq!("dijkstra".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::Dijkstra));
        assert!("bfs".parse::<RouteAlgorithm>().is_err());
    }

    #[test]
    fn empty_graph_is_rejected() {
        let graph = GraphBuilder::new().build();
        let err = shortest_path(&graph, 0.0, 0.0, 1.0, 1.0).expect_err("empty graph");
        assert!(matches!(err, Error::EmptyGraph));
    }
}
