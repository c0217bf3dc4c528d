//! Output formatting for command results.
//!
//! Every command renders either a human-readable text view or pretty JSON
//! of the library result types.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use bearmaps_lib::{Completions, Location, RasterResult, RoutePlan};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Serialize `value` as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output as JSON")
}

/// Text view of a raster result: metadata then the tile grid row by row.
pub fn render_raster_text(result: &RasterResult) -> String {
    let Some(grid) = &result.render_grid else {
        return "Query box does not intersect the map.".to_string();
    };

    let (rows, cols) = result.dimensions();
    let mut out = String::new();
    let _ = writeln!(out, "depth: {}", result.depth);
    let _ = writeln!(out, "grid: {rows} x {cols}");
    let _ = writeln!(
        out,
        "upper left: {:.6}, {:.6}",
        result.raster_ul_lon, result.raster_ul_lat
    );
    let _ = writeln!(
        out,
        "lower right: {:.6}, {:.6}",
        result.raster_lr_lon, result.raster_lr_lat
    );
    for row in grid {
        let _ = writeln!(out, "{}", row.join(" "));
    }
    out.trim_end().to_string()
}

/// Text view of a route: a summary line then numbered directions.
pub fn render_route_text(plan: &RoutePlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Route from node {} to node {} ({} hops, {:.3} miles, algorithm: {})",
        plan.start,
        plan.goal,
        plan.hop_count(),
        plan.total_distance,
        plan.algorithm
    );
    if plan.directions.is_empty() {
        let _ = writeln!(out, "Already at destination.");
    }
    for (index, step) in plan.directions.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", index + 1, step);
    }
    out.trim_end().to_string()
}

/// Text view of prefix completions, one name per line.
pub fn render_completions_text(prefix: &str, completions: &Completions) -> String {
    match completions {
        Completions::NotFound => format!("No locations match '{prefix}'."),
        Completions::Found(names) if names.is_empty() => {
            format!("No locations match '{prefix}'.")
        }
        Completions::Found(names) => names.join("\n"),
    }
}

/// Text view of exact-name matches.
pub fn render_locations_text(found: &[Location]) -> String {
    found
        .iter()
        .map(|location| {
            format!(
                "{} (node {}) at {:.6}, {:.6}",
                location.name, location.id, location.lon, location.lat
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
