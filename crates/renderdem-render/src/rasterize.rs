//! Per-tile rasterization: point filtering, grid accumulation, empty
//! detection and raster output.

use crate::{Result, Tile};
use renderdem_grid::{GridAccumulator, Statistic};
use renderdem_pointcloud::PointSet;
use renderdem_raster::{write_raster, RasterParams};

/// Rasterize one tile against the global point set.
///
/// Returns `true` when a raster file was written, `false` when the tile had
/// no data. The accumulator lives exactly as long as this call.
pub(crate) fn rasterize_tile(
    tile: &Tile,
    pset: &PointSet,
    resolution: f64,
    statistic: Statistic,
) -> Result<bool> {
    // +1 covers the trailing edge pixel lost to truncation.
    let r_width = (tile.bounds.width() / resolution).floor() as usize + 1;
    let r_height = (tile.bounds.height() / resolution).floor() as usize + 1;

    let mut grid = GridAccumulator::new(
        tile.bounds.minx,
        tile.bounds.miny,
        r_width,
        r_height,
        resolution,
        tile.radius,
        statistic,
        0,
        1.0,
    )?;

    // Points in the buffered bounds contribute, so interpolation near tile
    // edges sees neighbors owned by adjacent tiles.
    for i in 0..pset.len() {
        if tile.buffered_bounds.contains(pset.x[i], pset.y[i]) {
            grid.add_point(pset.x[i], pset.y[i], pset.z[i]);
        }
    }

    grid.finalize();
    let data = grid.data()?;

    if data.iter().all(|v| v.is_nan()) {
        return Ok(false);
    }

    // North-up affine transform; raster row 0 is the northmost row.
    let transform = [
        tile.bounds.minx,
        resolution,
        0.0,
        tile.bounds.miny + resolution * r_height as f64,
        0.0,
        -resolution,
    ];
    let params = RasterParams {
        width: r_width,
        height: r_height,
        transform,
        wkt: pset.srs.wkt.as_deref(),
    };
    write_raster(&tile.filename, &params, data)?;
    Ok(true)
}
