//! Driver and scheduler: output directory handling, tile planning and the
//! parallel per-tile loop.

use crate::rasterize::rasterize_tile;
use crate::tiler::{plan_tiles, Tile, TilePlan};
use crate::{RenderError, Result};
use rayon::prelude::*;
use renderdem_grid::Statistic;
use renderdem_pointcloud::PointSet;
use std::path::PathBuf;
use tracing::info;

/// Configuration of one rendering run.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory receiving the output tiles.
    pub out_dir: PathBuf,
    /// Statistic accumulated per cell.
    pub statistic: Statistic,
    /// Maximum tile edge length in pixels.
    pub tile_size: u32,
    /// Radius settings, one stacked output layer each.
    pub radii: Vec<f64>,
    /// Output resolution in map units per pixel.
    pub resolution: f64,
    /// Safety ceiling on tiles per radius (0 = unlimited).
    pub max_tiles: u32,
    /// Overwrite an existing output directory.
    pub force: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            out_dir: PathBuf::from("output"),
            statistic: Statistic::Max,
            tile_size: 4096,
            radii: vec![0.56],
            resolution: 0.1,
            max_tiles: 0,
            force: false,
        }
    }
}

/// Render a point set to a tiled DEM.
///
/// Validates the output directory, plans the tile layout and runs the
/// per-tile rasterizer over a worker pool. The first tile failure aborts
/// the whole run; empty tiles are logged and skipped.
pub fn render(pset: &PointSet, opts: &RenderOptions) -> Result<()> {
    if opts.out_dir.exists() {
        if !opts.force {
            return Err(RenderError::OutputDirExists(
                opts.out_dir.display().to_string(),
            ));
        }
    } else {
        std::fs::create_dir_all(&opts.out_dir)?;
    }
    let out_dir = std::path::absolute(&opts.out_dir)?;

    let plan = plan_tiles(
        &pset.extent,
        opts.resolution,
        opts.tile_size,
        &opts.radii,
        opts.max_tiles,
        &out_dir,
    )?;

    render_tiles(&plan, pset, opts.statistic)
}

/// Run the per-tile rasterizer over every planned tile in parallel.
///
/// One worker task per tile, no shared mutable state between tasks; status
/// lines go through the tracing sink, which serializes per line. Fail-fast:
/// the first error stops the remaining work.
pub fn render_tiles(plan: &TilePlan, pset: &PointSet, statistic: Statistic) -> Result<()> {
    plan.tiles.par_iter().try_for_each(|tile| {
        let written = rasterize_tile(tile, pset, plan.resolution, statistic)?;
        info!("{}", tile_status(tile, written));
        Ok(())
    })
}

/// Status line logged for a finished tile: the output filename, marked
/// `[Empty]` when every cell came out empty and no file was written.
fn tile_status(tile: &Tile, written: bool) -> String {
    let name = tile
        .filename
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if written {
        name
    } else {
        format!("{} [Empty]", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderdem_pointcloud::Extent;

    #[test]
    fn test_tile_status_marks_empty_tiles() {
        let bounds = Extent::new(0.0, 10.0, 0.0, 10.0);
        let tile = Tile {
            radius: 0.56,
            bounds,
            buffered_bounds: bounds.buffered(1.12),
            filename: PathBuf::from("/out/r0.56_x0_y0.tif"),
        };
        assert_eq!(tile_status(&tile, true), "r0.56_x0_y0.tif");
        assert_eq!(tile_status(&tile, false), "r0.56_x0_y0.tif [Empty]");
    }
}
