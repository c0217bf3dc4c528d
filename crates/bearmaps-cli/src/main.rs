mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bearmaps_cli::output::OutputFormat;
use bearmaps_lib::RouteAlgorithm;

use commands::raster::{handle_raster_command, RasterCommandArgs};
use commands::route::{handle_route_command, RouteCommandArgs};
use commands::search::{handle_locations_command, handle_search_command};

#[derive(Parser, Debug)]
#[command(author, version, about = "Bear Maps rastering, routing and place search")]
struct Cli {
    /// Path to the map extract (overrides BEARMAPS_DATASET).
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select the map tiles covering a query box.
    #[command(allow_negative_numbers = true)]
    Raster {
        /// Upper-left longitude of the query box.
        #[arg(long)]
        ullon: f64,
        /// Upper-left latitude of the query box.
        #[arg(long)]
        ullat: f64,
        /// Lower-right longitude of the query box.
        #[arg(long)]
        lrlon: f64,
        /// Lower-right latitude of the query box.
        #[arg(long)]
        lrlat: f64,
        /// Viewport width in pixels.
        #[arg(long)]
        width: f64,
        /// Viewport height in pixels (defaults to the width).
        #[arg(long)]
        height: Option<f64>,
    },
    /// Compute driving directions between two coordinates.
    #[command(allow_negative_numbers = true)]
    Route {
        #[arg(long)]
        from_lon: f64,
        #[arg(long)]
        from_lat: f64,
        #[arg(long)]
        to_lon: f64,
        #[arg(long)]
        to_lat: f64,
        /// Algorithm to use when planning the route.
        #[arg(long, default_value_t = RouteAlgorithm::AStar)]
        algorithm: RouteAlgorithm,
    },
    /// List location names starting with a prefix.
    Search {
        /// Case-insensitive name prefix.
        prefix: String,
        /// Maximum number of names to print.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show every location with the given name.
    Locations {
        /// Case-insensitive full name.
        name: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data = cli.data.as_deref();

    match cli.command {
        Command::Raster {
            ullon,
            ullat,
            lrlon,
            lrlat,
            width,
            height,
        } => handle_raster_command(
            &RasterCommandArgs {
                ullon,
                ullat,
                lrlon,
                lrlat,
                width,
                height,
            },
            cli.format,
        ),
        Command::Route {
            from_lon,
            from_lat,
            to_lon,
            to_lat,
            algorithm,
        } => handle_route_command(
            data,
            &RouteCommandArgs {
                from_lon,
                from_lat,
                to_lon,
                to_lat,
                algorithm,
            },
            cli.format,
        ),
        Command::Search { prefix, limit } => {
            handle_search_command(data, &prefix, limit, cli.format)
        }
        Command::Locations { name } => handle_locations_command(data, &name, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
