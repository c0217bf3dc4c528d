#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use bearmaps_lib::{Graph, GraphBuilder, NodeId};
use rusqlite::Connection;
use tempfile::TempDir;

/// Small extract around a city block.
///
/// ```text
///   1 ---- 2 ---- 3        Hearst Avenue (primary): 1-2-3
///          |      |        Euclid Avenue (residential): 3-4
///          6      |        unnamed residential: 4-5
///   5 ----------- 4        Campus Path (footway): 2-6
/// ```
///
/// Way 104 (5-1) carries no tags and is ignored. Node 7 is a named point
/// that is not on any road.
pub const FIXTURE_SQL: &str = r#"
    CREATE TABLE nodes (id INTEGER PRIMARY KEY, lon REAL NOT NULL, lat REAL NOT NULL);
    CREATE TABLE node_tags (node_id INTEGER NOT NULL, k TEXT NOT NULL, v TEXT NOT NULL);
    CREATE TABLE ways (id INTEGER PRIMARY KEY);
    CREATE TABLE way_nodes (way_id INTEGER NOT NULL, node_id INTEGER NOT NULL, seq INTEGER NOT NULL);
    CREATE TABLE way_tags (way_id INTEGER NOT NULL, k TEXT NOT NULL, v TEXT NOT NULL);

    INSERT INTO nodes (id, lon, lat) VALUES
        (1, -122.2600, 37.8700),
        (2, -122.2550, 37.8700),
        (3, -122.2500, 37.8700),
        (4, -122.2500, 37.8650),
        (5, -122.2600, 37.8650),
        (6, -122.2550, 37.8680),
        (7, -122.2400, 37.8600);

    INSERT INTO node_tags (node_id, k, v) VALUES
        (2, 'name', 'Berkeley'),
        (7, 'name', 'Berkeley'),
        (6, 'name', 'Berkeley Lab'),
        (3, 'amenity', 'cafe');

    INSERT INTO ways (id) VALUES (100), (101), (102), (103), (104);

    INSERT INTO way_nodes (way_id, node_id, seq) VALUES
        (100, 3, 2), (100, 1, 0), (100, 2, 1),
        (101, 3, 0), (101, 4, 1),
        (102, 4, 0), (102, 5, 1),
        (103, 2, 0), (103, 6, 1),
        (104, 5, 0), (104, 1, 1);

    INSERT INTO way_tags (way_id, k, v) VALUES
        (100, 'highway', 'primary'),
        (100, 'name', 'Hearst Avenue'),
        (101, 'highway', 'residential'),
        (101, 'name', 'Euclid Avenue'),
        (102, 'highway', 'residential'),
        (103, 'highway', 'footway'),
        (103, 'name', 'Campus Path'),
        (103, 'surface', 'paved');
"#;

/// Write the fixture extract into a fresh temporary directory.
///
/// The directory must be kept alive for as long as the path is used.
pub fn fixture_extract() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("map.db");
    let conn = Connection::open(&path).expect("create fixture db");
    conn.execute_batch(FIXTURE_SQL).expect("populate fixture db");
    drop(conn);
    (dir, path)
}

/// Deterministic pseudo-random grid of `size * size` nodes.
///
/// Neighbouring grid cells are joined by a road with probability ~3/4 and
/// coordinates are jittered so that straight lines rarely tie.
pub fn synthetic_grid(size: i64, seed: u64) -> Graph {
    let mut rng = Lcg(seed);
    let mut builder = GraphBuilder::new();
    let id = |row: i64, col: i64| -> NodeId { row * size + col + 1 };

    for row in 0..size {
        for col in 0..size {
            let lon = -122.29 + col as f64 * 0.002 + rng.jitter();
            let lat = 37.89 - row as f64 * 0.002 + rng.jitter();
            builder.add_node(id(row, col), lon, lat);
        }
    }

    let mut way = 0;
    for row in 0..size {
        for col in 0..size {
            for (d_row, d_col) in [(0, 1), (1, 0)] {
                let (n_row, n_col) = (row + d_row, col + d_col);
                if n_row >= size || n_col >= size || rng.next() % 4 == 0 {
                    continue;
                }
                way += 1;
                let (a, b) = (id(row, col), id(n_row, n_col));
                builder.add_edge(way, &format!("Road {}", way % 5), a, b);
                builder.add_connected_node_id(a);
                builder.add_connected_node_id(b);
            }
        }
    }

    builder.build()
}

/// Sum of hop distances along `route`.
pub fn route_length(graph: &Graph, route: &[NodeId]) -> f64 {
    route
        .windows(2)
        .map(|pair| graph.distance(pair[0], pair[1]))
        .sum()
}

/// Shortest distance from `start` to `goal` by Bellman-Ford relaxation over
/// the undirected edges among `ids`, or `None` when `goal` is unreachable.
///
/// Shares nothing with the search code beyond `Graph::neighbours` and
/// `Graph::distance`.
pub fn bellman_ford_distance(
    graph: &Graph,
    ids: &[NodeId],
    start: NodeId,
    goal: NodeId,
) -> Option<f64> {
    let index: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let mut edges = Vec::new();
    for &from in ids {
        for (to, _) in graph.neighbours(from) {
            if let Some(&j) = index.get(&to) {
                edges.push((index[&from], j, graph.distance(from, to)));
            }
        }
    }

    let mut dist = vec![f64::INFINITY; ids.len()];
    dist[*index.get(&start)?] = 0.0;
    for _ in 1..ids.len() {
        let mut changed = false;
        for &(u, v, w) in &edges {
            if dist[u] + w < dist[v] {
                dist[v] = dist[u] + w;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let d = dist[*index.get(&goal)?];
    d.is_finite().then_some(d)
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn jitter(&mut self) -> f64 {
        (self.next() % 1000) as f64 * 1e-7
    }
}
