use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the Bear Maps library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Map extract could not be located at the resolved path.
    #[error("map extract not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the map extract")]
    ProjectDirsUnavailable,

    /// Raised when the extract does not contain the expected tables.
    #[error("unsupported map extract schema; expected nodes/ways/way_nodes/way_tags/node_tags tables")]
    UnsupportedSchema,

    /// Raised when a required query argument was absent.
    #[error("missing required argument: {name}")]
    InvalidArgument { name: &'static str },

    /// Raised when a query runs against a graph without any routable nodes.
    #[error("graph has no connected nodes to route between")]
    EmptyGraph,

    /// Raised when no route could be found between two nodes.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: NodeId, goal: NodeId },

    /// Raised when a location name could not be found in the graph.
    #[error("unknown location name: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a navigation direction string cannot be parsed.
    #[error("invalid navigation direction: {text:?}")]
    InvalidDirection { text: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
