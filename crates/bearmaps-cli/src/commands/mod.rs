// Subcommand handlers dispatched from main.rs.

pub mod raster;
pub mod route;
pub mod search;

use std::path::Path;

use anyhow::{Context, Result};
use bearmaps_lib::{load_map, resolve_dataset_path, Graph};

/// Resolve the extract location and load the road graph.
pub fn load_graph(target: Option<&Path>) -> Result<Graph> {
    let dataset_path =
        resolve_dataset_path(target).context("failed to locate the map extract")?;
    load_map(&dataset_path)
        .with_context(|| format!("failed to load map extract from {}", dataset_path.display()))
}
