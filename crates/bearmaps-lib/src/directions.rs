//! Turn-by-turn directions derived from a node path.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, WayId};

/// Placeholder rendered for ways without a display name.
pub const UNKNOWN_ROAD: &str = "unknown road";

/// Manoeuvre at the start of a direction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Right,
    Left,
    SharpLeft,
    SharpRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Start,
        Direction::Straight,
        Direction::SlightLeft,
        Direction::SlightRight,
        Direction::Right,
        Direction::Left,
        Direction::SharpLeft,
        Direction::SharpRight,
    ];

    /// Numeric code understood by the front end.
    pub fn code(self) -> u8 {
        match self {
            Direction::Start => 0,
            Direction::Straight => 1,
            Direction::SlightLeft => 2,
            Direction::SlightRight => 3,
            Direction::Right => 4,
            Direction::Left => 5,
            Direction::SharpLeft => 6,
            Direction::SharpRight => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Start => "Start",
            Direction::Straight => "Go straight",
            Direction::SlightLeft => "Slight left",
            Direction::SlightRight => "Slight right",
            Direction::Right => "Turn right",
            Direction::Left => "Turn left",
            Direction::SharpLeft => "Sharp left",
            Direction::SharpRight => "Sharp right",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    /// Classify the change between two bearings in `[0, 360)`.
    ///
    /// The delta is not normalised: values beyond ±180 fall into the
    /// wrap-around bands, where anything within 30° of a full turn reads as a
    /// slight turn towards the opposite side.
    pub fn from_bearings(previous: f64, current: f64) -> Self {
        let delta = current - previous;
        if (-15.0..=15.0).contains(&delta) {
            Direction::Straight
        } else if (-30.0..=30.0).contains(&delta) {
            if delta < 0.0 {
                Direction::SlightLeft
            } else {
                Direction::SlightRight
            }
        } else if (-100.0..=100.0).contains(&delta) {
            if delta < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if delta >= 180.0 || delta <= -180.0 {
            if delta < 0.0 {
                if delta <= -330.0 {
                    Direction::SlightRight
                } else {
                    Direction::Right
                }
            } else if delta >= 330.0 {
                Direction::SlightLeft
            } else {
                Direction::Left
            }
        } else if delta < 0.0 {
            Direction::SharpLeft
        } else {
            Direction::SharpRight
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One step of a turn-by-turn itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationDirection {
    pub direction: Direction,
    pub way: String,
    /// Distance travelled along `way`, in miles.
    pub distance: f64,
}

impl NavigationDirection {
    pub fn new(direction: Direction, way: impl Into<String>, distance: f64) -> Self {
        Self {
            direction,
            way: way.into(),
            distance,
        }
    }
}

impl Default for NavigationDirection {
    fn default() -> Self {
        Self::new(Direction::Straight, UNKNOWN_ROAD, 0.0)
    }
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.direction, self.way, self.distance
        )
    }
}

impl FromStr for NavigationDirection {
    type Err = Error;

    /// Parse the form produced by `Display`.
    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidDirection {
            text: text.to_string(),
        };

        let body = text.strip_suffix(" miles.").ok_or_else(invalid)?;
        let (head, distance) = body
            .rsplit_once(" and continue for ")
            .ok_or_else(invalid)?;
        let (label, way) = head.split_once(" on ").ok_or_else(invalid)?;

        let direction = Direction::from_label(label).ok_or_else(invalid)?;
        let distance: f64 = distance.parse().map_err(|_| invalid())?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(invalid());
        }

        Ok(Self::new(direction, way, distance))
    }
}

/// Translate a node path into turn-by-turn directions.
///
/// A new step begins whenever the way name changes. The first step is
/// always [`Direction::Start`]; later steps take their direction from the
/// bearing change across the boundary hop. The open step is emitted once the
/// path ends. Hops between non-adjacent nodes are skipped without closing the
/// current step. Routes with fewer than two nodes produce no directions.
pub fn route_directions(graph: &Graph, route: &[NodeId]) -> Vec<NavigationDirection> {
    let mut directions = Vec::new();
    let mut direction = Direction::Start;
    let mut distance = 0.0;
    let mut previous: Option<(WayId, f64)> = None;

    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let Some(way_id) = graph.way_between(from, to) else {
            continue;
        };
        let bearing = graph.bearing(from, to);
        let hop_distance = graph.distance(from, to);

        match previous {
            Some((previous_way, previous_bearing))
                if graph.way_name(way_id) != graph.way_name(previous_way) =>
            {
                directions.push(NavigationDirection::new(
                    direction,
                    display_name(graph, previous_way),
                    distance,
                ));
                direction = Direction::from_bearings(previous_bearing, bearing);
                distance = hop_distance;
            }
            _ => distance += hop_distance,
        }
        previous = Some((way_id, bearing));
    }

    if let Some((way_id, _)) = previous {
        directions.push(NavigationDirection::new(
            direction,
            display_name(graph, way_id),
            distance,
        ));
    }
    directions
}

fn display_name(graph: &Graph, way: WayId) -> String {
    let name = graph.way_name(way);
    if name.is_empty() {
        UNKNOWN_ROAD.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn threshold_table() {
        let cases = [
            (0.0, 0.0, Direction::Straight),
            (90.0, 105.0, Direction::Straight),
            (90.0, 75.0, Direction::Straight),
            (90.0, 110.0, Direction::SlightRight),
            (90.0, 60.0, Direction::SlightLeft),
            (90.0, 120.0, Direction::SlightRight),
            (90.0, 121.0, Direction::Right),
            (90.0, 190.0, Direction::Right),
            (90.0, 0.0, Direction::Left),
            (90.0, 191.0, Direction::SharpRight),
            (200.0, 20.5, Direction::SharpLeft),
            (0.0, 200.0, Direction::Left),
            (10.0, 350.0, Direction::SlightLeft),
            (200.0, 20.0, Direction::Right),
            (350.0, 10.0, Direction::SlightRight),
        ];
        for (previous, current, expected) in cases {
            assert_eq!(
                Direction::from_bearings(previous, current),
                expected,
                "{previous} -> {current}"
            );
        }
    }

    #[test]
    fn codes_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_code(direction.code()), Some(direction));
        }
        assert_eq!(Direction::from_code(8), None);
    }

    #[test]
    fn display_and_parse() {
        let step = NavigationDirection::new(Direction::SlightLeft, "Telegraph Avenue", 0.1234);
        let text = step.to_string();
        assert_eq!(
            text,
            "Slight left on Telegraph Avenue and continue for 0.123 miles."
        );
        let parsed: NavigationDirection = text.parse().expect("parses");
        assert_eq!(parsed.direction, Direction::SlightLeft);
        assert_eq!(parsed.way, "Telegraph Avenue");
        assert!((parsed.distance - 0.123).abs() < 1e-12);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("Fly north on Cloud 9 and continue for 1.000 miles."
            .parse::<NavigationDirection>()
            .is_err());
        assert!("Start on Oxford Street".parse::<NavigationDirection>().is_err());
        assert!("Start on Oxford Street and continue for lots miles."
            .parse::<NavigationDirection>()
            .is_err());
    }

    fn corner() -> Graph {
        // 1 -> 2 heads east on Hearst, 2 -> 3 heads north on an unnamed way.
        let mut builder = GraphBuilder::new();
        builder.add_node(1, -122.260, 37.870);
        builder.add_node(2, -122.250, 37.870);
        builder.add_node(3, -122.250, 37.880);
        builder.add_edge(1, "Hearst Avenue", 1, 2);
        builder.add_edge(2, "", 2, 3);
        builder.build()
    }

    #[test]
    fn way_change_opens_new_step() {
        let graph = corner();
        let directions = route_directions(&graph, &[1, 2, 3]);
        assert_eq!(directions.len(), 2);
        assert_eq!(directions[0].direction, Direction::Start);
        assert_eq!(directions[0].way, "Hearst Avenue");
        assert!((directions[0].distance - graph.distance(1, 2)).abs() < 1e-12);
        assert_eq!(directions[1].direction, Direction::Left);
        assert_eq!(directions[1].way, UNKNOWN_ROAD);
        assert!((directions[1].distance - graph.distance(2, 3)).abs() < 1e-12);
    }

    #[test]
    fn trailing_gap_keeps_travelled_step() {
        let mut builder = GraphBuilder::new();
        builder.add_node(1, -122.260, 37.870);
        builder.add_node(2, -122.250, 37.870);
        builder.add_node(3, -122.250, 37.880);
        builder.add_edge(1, "Hearst Avenue", 1, 2);
        let graph = builder.build();

        let directions = route_directions(&graph, &[1, 2, 3]);
        assert_eq!(directions.len(), 1);
        assert_eq!(directions[0].direction, Direction::Start);
        assert_eq!(directions[0].way, "Hearst Avenue");
        assert!((directions[0].distance - graph.distance(1, 2)).abs() < 1e-12);
    }

    #[test]
    fn route_without_edges_has_no_directions() {
        let graph = corner();
        assert!(route_directions(&graph, &[1, 3]).is_empty());
    }

    #[test]
    fn short_routes_have_no_directions() {
        let graph = corner();
        assert!(route_directions(&graph, &[]).is_empty());
        assert!(route_directions(&graph, &[2]).is_empty());
    }
}
