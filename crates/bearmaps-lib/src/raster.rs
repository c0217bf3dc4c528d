//! Viewport to tile-grid selection.
//!
//! The root bounding box is split into a quadtree of square tiles: depth `d`
//! has `2^d` columns and `2^d` rows. For a query box and viewport width the
//! rasterer picks the coarsest depth that still resolves at least as much
//! longitude per pixel as the viewport needs, then names every tile touching
//! the box.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of tile depths available (0 coarsest through 7 finest).
pub const DEPTH_LEVELS: usize = 8;

/// Deepest available tile depth.
pub const MAX_DEPTH: u32 = DEPTH_LEVELS as u32 - 1;

pub const ROOT_ULLAT: f64 = 37.892195547244356;
pub const ROOT_ULLON: f64 = -122.2998046875;
pub const ROOT_LRLAT: f64 = 37.82280243352756;
pub const ROOT_LRLON: f64 = -122.2119140625;
/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Bounds of the root tile and the pixel size of every tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
    pub tile_size: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            ullon: ROOT_ULLON,
            ullat: ROOT_ULLAT,
            lrlon: ROOT_LRLON,
            lrlat: ROOT_LRLAT,
            tile_size: TILE_SIZE,
        }
    }
}

impl MapBounds {
    fn lon_span(&self) -> f64 {
        self.lrlon - self.ullon
    }

    fn lat_span(&self) -> f64 {
        self.ullat - self.lrlat
    }
}

/// Query box plus viewport size, as sent by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterRequest {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
    /// Viewport width in pixels.
    pub w: f64,
    /// Viewport height in pixels.
    pub h: f64,
}

/// Tiles to draw for a query, or the failure sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterResult {
    pub render_grid: Option<Vec<Vec<String>>>,
    pub raster_ul_lon: f64,
    pub raster_ul_lat: f64,
    pub raster_lr_lon: f64,
    pub raster_lr_lat: f64,
    pub depth: u32,
    pub query_success: bool,
}

impl RasterResult {
    /// Result returned for degenerate or out-of-bounds queries.
    pub fn failure() -> Self {
        Self {
            render_grid: None,
            raster_ul_lon: 0.0,
            raster_ul_lat: 0.0,
            raster_lr_lon: 0.0,
            raster_lr_lat: 0.0,
            depth: 0,
            query_success: false,
        }
    }

    /// Number of tile rows and columns in the grid.
    pub fn dimensions(&self) -> (usize, usize) {
        match &self.render_grid {
            Some(rows) => (rows.len(), rows.first().map_or(0, Vec::len)),
            None => (0, 0),
        }
    }
}

/// Name of the tile image at `depth`, column `x`, row `y`.
pub fn tile_name(depth: u32, x: u32, y: u32) -> String {
    format!("d{depth}_x{x}_y{y}.png")
}

/// Tile selector for a fixed root bounding box.
#[derive(Debug, Clone)]
pub struct Rasterer {
    bounds: MapBounds,
    lon_dpp_by_depth: [f64; DEPTH_LEVELS],
}

impl Default for Rasterer {
    fn default() -> Self {
        Self::new(MapBounds::default())
    }
}

impl Rasterer {
    pub fn new(bounds: MapBounds) -> Self {
        let mut lon_dpp_by_depth = [0.0; DEPTH_LEVELS];
        for (depth, lon_dpp) in lon_dpp_by_depth.iter_mut().enumerate() {
            *lon_dpp = bounds.lon_span() / tiles_across(depth as u32) / bounds.tile_size;
        }
        Self {
            bounds,
            lon_dpp_by_depth,
        }
    }

    pub fn bounds(&self) -> &MapBounds {
        &self.bounds
    }

    /// Longitude distance per pixel achieved by tiles at `depth`.
    pub fn lon_dpp(&self, depth: u32) -> Option<f64> {
        self.lon_dpp_by_depth.get(depth as usize).copied()
    }

    /// Coarsest depth whose LonDPP does not exceed `query_lon_dpp`, falling
    /// back to the finest depth.
    pub fn depth_for(&self, query_lon_dpp: f64) -> u32 {
        self.lon_dpp_by_depth
            .iter()
            .position(|&lon_dpp| lon_dpp <= query_lon_dpp)
            .map_or(MAX_DEPTH, |depth| depth as u32)
    }

    /// Select and name the tiles covering `request`.
    pub fn get_map_raster(&self, request: &RasterRequest) -> RasterResult {
        if !self.is_valid(request) {
            debug!(?request, "rejected raster query");
            return RasterResult::failure();
        }

        let query_lon_dpp = (request.lrlon - request.ullon) / request.w;
        let depth = self.depth_for(query_lon_dpp);
        let n = tiles_across(depth);
        let tile_lon = self.bounds.lon_span() / n;
        let tile_lat = self.bounds.lat_span() / n;

        let ul_x = clamp_index((request.ullon - self.bounds.ullon) / tile_lon, depth);
        let ul_y = clamp_index((self.bounds.ullat - request.ullat) / tile_lat, depth);
        let lr_x = clamp_index((request.lrlon - self.bounds.ullon) / tile_lon, depth);
        let lr_y = clamp_index((self.bounds.ullat - request.lrlat) / tile_lat, depth);

        let render_grid: Vec<Vec<String>> = (ul_y..=lr_y)
            .map(|y| (ul_x..=lr_x).map(|x| tile_name(depth, x, y)).collect())
            .collect();

        let result = RasterResult {
            render_grid: Some(render_grid),
            raster_ul_lon: self.bounds.ullon + ul_x as f64 * tile_lon,
            raster_ul_lat: self.bounds.ullat - ul_y as f64 * tile_lat,
            raster_lr_lon: self.bounds.ullon + (lr_x + 1) as f64 * tile_lon,
            raster_lr_lat: self.bounds.ullat - (lr_y + 1) as f64 * tile_lat,
            depth,
            query_success: true,
        };
        debug!(
            depth,
            rows = lr_y - ul_y + 1,
            cols = lr_x - ul_x + 1,
            "rastered query box"
        );
        result
    }

    fn is_valid(&self, request: &RasterRequest) -> bool {
        let finite = [request.ullon, request.ullat, request.lrlon, request.lrlat, request.w]
            .iter()
            .all(|v| v.is_finite());
        if !finite || request.w <= 0.0 {
            return false;
        }
        if request.lrlon <= request.ullon || request.lrlat >= request.ullat {
            return false;
        }
        if request.lrlon < self.bounds.ullon || request.ullon > self.bounds.lrlon {
            return false;
        }
        if request.lrlat > self.bounds.ullat || request.ullat < self.bounds.lrlat {
            return false;
        }
        true
    }
}

fn tiles_across(depth: u32) -> f64 {
    f64::from(1u32 << depth)
}

fn clamp_index(offset: f64, depth: u32) -> u32 {
    let max = (1u32 << depth) - 1;
    if offset <= 0.0 {
        0
    } else {
        (offset.floor() as u32).min(max)
    }
}
