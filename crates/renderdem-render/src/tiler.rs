//! Tile planning: raster sizing, the resolution floor, split counts and
//! per-radius tile enumeration.

use crate::{RenderError, Result};
use renderdem_pointcloud::Extent;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Minimum raster dimension in pixels. A wrongly estimated scale of the
/// input model can push the requested resolution unrealistically low; the
/// floor keeps the output usable at the cost of a rescaled resolution.
pub const RES_FLOOR: u32 = 64;

/// Buffer multiplier applied to the tile radius. Guarantees interpolation
/// kernels with support `radius` never miss a contributing point near a
/// tile boundary.
const RADIUS_BUFFER_FACTOR: f64 = 2.0;

/// One unit of rasterization work: a rectangle of the output DEM for one
/// radius setting.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Interpolation radius this tile is rendered with.
    pub radius: f64,
    /// Core bounds; tiles of one radius cover the extent seamlessly.
    pub bounds: Extent,
    /// Bounds expanded by `2 x radius`; points inside contribute.
    pub buffered_bounds: Extent,
    /// Output file this tile produces.
    pub filename: PathBuf,
}

/// Result of tile planning.
///
/// `resolution` and `radii` may differ from the requested values when the
/// resolution floor kicked in; all downstream math must use these.
#[derive(Debug)]
pub struct TilePlan {
    /// Tiles in ascending-radius order.
    pub tiles: Vec<Tile>,
    /// Effective output resolution in map units per pixel.
    pub resolution: f64,
    /// Effective radius list.
    pub radii: Vec<f64>,
    /// Full DEM width in pixels.
    pub width: u32,
    /// Full DEM height in pixels.
    pub height: u32,
    /// Tile columns per radius.
    pub splits_x: u32,
    /// Tile rows per radius.
    pub splits_y: u32,
}

/// Plan the tile layout for a point set extent.
///
/// Produces one seamless cover of the extent per radius, each tile carrying
/// radius-buffered bounds and a deterministic output filename under
/// `out_dir`. Tiles are ordered by ascending radius, cells in column-major
/// enumeration order within one radius.
pub fn plan_tiles(
    extent: &Extent,
    resolution: f64,
    tile_size: u32,
    radii: &[f64],
    max_tiles: u32,
    out_dir: &Path,
) -> Result<TilePlan> {
    if resolution <= 0.0 {
        return Err(RenderError::InvalidParameter(format!(
            "resolution must be positive, got {}",
            resolution
        )));
    }
    if tile_size == 0 {
        return Err(RenderError::InvalidParameter(
            "tile-size must be positive".to_string(),
        ));
    }
    if radii.is_empty() {
        return Err(RenderError::InvalidParameter(
            "at least one radius is required".to_string(),
        ));
    }
    if let Some(bad) = radii.iter().find(|r| **r <= 0.0) {
        return Err(RenderError::InvalidParameter(format!(
            "radius must be positive, got {}",
            bad
        )));
    }

    let mut resolution = resolution;
    let mut radii = radii.to_vec();

    let mut width = (extent.width() / resolution).ceil() as u32;
    let mut height = (extent.height() / resolution).ceil() as u32;

    if width < RES_FLOOR && height < RES_FLOOR {
        let prev_width = f64::from(width);
        let prev_height = f64::from(height);

        if width >= height {
            width = RES_FLOOR;
            height = (extent.height() / extent.width() * f64::from(RES_FLOOR)).ceil() as u32;
        } else {
            width = (extent.width() / extent.height() * f64::from(RES_FLOOR)).ceil() as u32;
            height = RES_FLOOR;
        }

        let floor_ratio = prev_width / f64::from(width);
        resolution *= floor_ratio;
        for r in radii.iter_mut() {
            *r *= floor_ratio;
        }

        warn!(
            "Really low resolution DEM requested ({}, {}) will set floor at {} pixels. Resolution changed to {}. The scale of this reconstruction might be off",
            prev_width, prev_height, RES_FLOOR, resolution
        );
    }

    let splits_x = ((f64::from(width) / f64::from(tile_size)).ceil() as u32).max(1);
    let splits_y = ((f64::from(height) / f64::from(tile_size)).ceil() as u32).max(1);
    // The per-radius count can exceed u32 for degenerate extents.
    let num_tiles = u64::from(splits_x) * u64::from(splits_y);

    info!(
        "DEM resolution is ({}, {}), max tile size is {}, will split DEM generation into {} tiles",
        width, height, tile_size, num_tiles
    );

    if max_tiles > 0 && num_tiles > u64::from(max_tiles) {
        return Err(RenderError::TooManyTiles {
            tiles: num_tiles,
            max: max_tiles,
        });
    }

    let tile_bounds_width = extent.width() / f64::from(splits_x);
    let tile_bounds_height = extent.height() / f64::from(splits_y);

    let mut tiles = Vec::with_capacity(num_tiles as usize * radii.len());

    for &radius in &radii {
        let mut minx = extent.minx;
        for x in 0..splits_x {
            // The last column snaps to the extent edge instead of
            // accumulating rounding error.
            let maxx = if x == splits_x - 1 {
                extent.maxx
            } else {
                minx + tile_bounds_width
            };

            let mut miny = extent.miny;
            for y in 0..splits_y {
                let maxy = if y == splits_y - 1 {
                    extent.maxy
                } else {
                    miny + tile_bounds_height
                };

                let bounds = Extent::new(minx, maxx, miny, maxy);
                tiles.push(Tile {
                    radius,
                    bounds,
                    buffered_bounds: bounds.buffered(radius * RADIUS_BUFFER_FACTOR),
                    filename: out_dir.join(format!("r{}_x{}_y{}.tif", radius, x, y)),
                });

                miny = maxy;
            }
            minx = maxx;
        }
    }

    // Stable: cells keep their enumeration order within one radius.
    tiles.sort_by(|a, b| a.radius.total_cmp(&b.radius));

    Ok(TilePlan {
        tiles,
        resolution,
        radii,
        width,
        height,
        splits_x,
        splits_y,
    })
}
