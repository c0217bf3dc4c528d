//! Autocomplete and "go to" queries as seen by the front end.
//!
//! Request parameters arrive optional; an absent argument is a caller bug and
//! is reported as [`Error::InvalidArgument`] rather than an empty result.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, Location};

/// Suggestions offered with an unknown-location error.
const MAX_SUGGESTIONS: usize = 3;

/// Outcome of a prefix query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "names", rename_all = "snake_case")]
pub enum Completions {
    /// No stored name passes through the prefix.
    NotFound,
    /// Names starting with the prefix (possibly empty).
    Found(Vec<String>),
}

impl Completions {
    /// Completions as a list, empty when not found.
    pub fn into_names(self) -> Vec<String> {
        match self {
            Completions::NotFound => Vec::new(),
            Completions::Found(names) => names,
        }
    }
}

/// Location names starting with `prefix`, case-insensitively.
pub fn autocomplete(graph: &Graph, prefix: Option<&str>) -> Result<Completions> {
    let prefix = prefix.ok_or(Error::InvalidArgument { name: "prefix" })?;
    Ok(match graph.location_names(prefix) {
        Some(names) => Completions::Found(names),
        None => Completions::NotFound,
    })
}

/// Every location stored under the exact name, for "go to" selection.
///
/// Unknown names fail with suggestions drawn from similar location names.
pub fn locations(graph: &Graph, name: Option<&str>) -> Result<Vec<Location>> {
    let name = name.ok_or(Error::InvalidArgument { name: "name" })?;
    let found = graph.locations(name);
    if found.is_empty() {
        return Err(Error::UnknownLocation {
            name: name.to_string(),
            suggestions: graph.fuzzy_location_matches(name, MAX_SUGGESTIONS),
        });
    }
    Ok(found)
}
