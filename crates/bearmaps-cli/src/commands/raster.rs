//! Raster command handler.

use anyhow::Result;

use bearmaps_cli::output::{render_raster_text, to_json, OutputFormat};
use bearmaps_lib::{RasterRequest, Rasterer};

/// Arguments for the raster command.
#[derive(Debug, Clone, Copy)]
pub struct RasterCommandArgs {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
    pub width: f64,
    pub height: Option<f64>,
}

/// Handle the raster subcommand. No map extract is needed.
pub fn handle_raster_command(args: &RasterCommandArgs, format: OutputFormat) -> Result<()> {
    let request = RasterRequest {
        ullon: args.ullon,
        ullat: args.ullat,
        lrlon: args.lrlon,
        lrlat: args.lrlat,
        w: args.width,
        h: args.height.unwrap_or(args.width),
    };
    let result = Rasterer::default().get_map_raster(&request);

    match format {
        OutputFormat::Json => println!("{}", to_json(&result)?),
        OutputFormat::Text => println!("{}", render_raster_text(&result)),
    }
    Ok(())
}
