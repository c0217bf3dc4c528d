//! Route command handler for computing driving directions between two points.

use std::path::Path;

use anyhow::{Context, Result};

use bearmaps_cli::output::{render_route_text, to_json, OutputFormat};
use bearmaps_lib::{plan_route, Position, RouteAlgorithm, RouteRequest};

use super::load_graph;

/// Arguments for the route command.
#[derive(Debug, Clone, Copy)]
pub struct RouteCommandArgs {
    pub from_lon: f64,
    pub from_lat: f64,
    pub to_lon: f64,
    pub to_lat: f64,
    pub algorithm: RouteAlgorithm,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest {
            start: Position::new(self.from_lon, self.from_lat),
            goal: Position::new(self.to_lon, self.to_lat),
            algorithm: self.algorithm,
        }
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    target_path: Option<&Path>,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let plan = plan_route(&graph, &args.to_request()).context("failed to plan route")?;

    match format {
        OutputFormat::Json => println!("{}", to_json(&plan)?),
        OutputFormat::Text => println!("{}", render_route_text(&plan)),
    }
    Ok(())
}
