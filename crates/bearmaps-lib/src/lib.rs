//! Bear Maps library entry points.
//!
//! This crate loads a road map extract into an immutable graph and answers the
//! queries a map front end needs: which tiles to draw for a viewport, the
//! shortest driving route between two points with turn-by-turn directions, and
//! place-name autocomplete. Higher-level consumers (the CLI) should only depend
//! on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod db;
pub mod directions;
pub mod error;
pub mod geo;
pub mod graph;
pub mod path;
pub mod raster;
pub mod routing;
pub mod search;
pub mod spatial;
pub mod trie;

pub use dataset::{default_dataset_path, resolve_dataset_path, DATASET_ENV_VAR};
pub use db::{is_routable_highway, load_map};
pub use directions::{route_directions, Direction, NavigationDirection, UNKNOWN_ROAD};
pub use error::{Error, Result};
pub use geo::{bearing, haversine, Position, EARTH_RADIUS_MILES};
pub use graph::{Graph, GraphBuilder, Location, Node, NodeId, Way, WayId};
pub use path::{find_route_a_star, find_route_dijkstra, Heuristic, SearchState};
pub use raster::{tile_name, MapBounds, RasterRequest, RasterResult, Rasterer};
pub use routing::{plan_route, shortest_path, RouteAlgorithm, RoutePlan, RouteRequest, RouteStep};
pub use search::{autocomplete, locations, Completions};
pub use spatial::SpatialIndex;
pub use trie::Trie;
