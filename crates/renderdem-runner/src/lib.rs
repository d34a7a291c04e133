//! # renderdem-runner
//!
//! Wires the command line surface to the rendering pipeline: parse
//! arguments, read the point cloud, render the tiled DEM.

mod args;
mod error;

pub use args::Args;
pub use error::RunnerError;

use renderdem_grid::Statistic;
use renderdem_pointcloud::read_point_set;
use renderdem_render::{render, RenderOptions};
use tracing::info;

/// Execute one rendering run as described by the parsed arguments.
pub fn run(args: &Args) -> Result<(), RunnerError> {
    let input = args.input().ok_or(RunnerError::MissingInput)?;
    let statistic: Statistic = args.output_type.parse()?;

    let pset = read_point_set(input, args.classification, args.decimation)?;
    info!(
        "Read {} points from {}, rendering {} DEM",
        pset.len(),
        input.display(),
        statistic.name()
    );

    let opts = RenderOptions {
        out_dir: args.outdir.clone(),
        statistic,
        tile_size: args.tile_size,
        radii: args.radiuses.clone(),
        resolution: args.resolution,
        max_tiles: args.max_tiles,
        force: args.force,
    };
    render(&pset, &opts)?;
    Ok(())
}
