//! Place-name search handlers: prefix autocomplete and exact lookup.

use std::path::Path;

use anyhow::Result;

use bearmaps_cli::output::{render_completions_text, render_locations_text, to_json, OutputFormat};
use bearmaps_lib::{autocomplete, locations, Completions};

use super::load_graph;

/// Handle the search subcommand.
pub fn handle_search_command(
    target_path: Option<&Path>,
    prefix: &str,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let completions = match autocomplete(&graph, Some(prefix))? {
        Completions::Found(mut names) => {
            if let Some(limit) = limit {
                names.truncate(limit);
            }
            Completions::Found(names)
        }
        Completions::NotFound => Completions::NotFound,
    };

    match format {
        OutputFormat::Json => println!("{}", to_json(&completions)?),
        OutputFormat::Text => println!("{}", render_completions_text(prefix, &completions)),
    }
    Ok(())
}

/// Handle the locations subcommand.
pub fn handle_locations_command(
    target_path: Option<&Path>,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let found = locations(&graph, Some(name))?;

    match format {
        OutputFormat::Json => println!("{}", to_json(&found)?),
        OutputFormat::Text => println!("{}", render_locations_text(&found)),
    }
    Ok(())
}
