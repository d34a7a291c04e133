//! Command line argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Render a point cloud to a raster DEM.
#[derive(Parser, Debug, Clone)]
#[command(name = "renderdem", version, about = "Render a point cloud to a raster DEM")]
pub struct Args {
    /// Input point cloud (.las, .ply)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Input point cloud given positionally
    #[arg(value_name = "point cloud", conflicts_with = "input")]
    pub input_positional: Option<PathBuf>,

    /// Tile size in pixels
    #[arg(short = 't', long = "tile-size", default_value_t = 4096)]
    pub tile_size: u32,

    /// Only use points matching this classification (-1 = no filter)
    #[arg(short = 'c', long = "classification", default_value_t = -1, allow_hyphen_values = true)]
    pub classification: i32,

    /// Read every Nth point
    #[arg(short = 'd', long = "decimation", default_value_t = 1)]
    pub decimation: u32,

    /// One of: [max, idw]
    #[arg(short = 'o', long = "output-type", default_value = "max")]
    pub output_type: String,

    /// Comma separated list of radius values to generate and stack
    #[arg(
        short = 's',
        long = "radiuses",
        default_value = "0.56",
        value_delimiter = ','
    )]
    pub radiuses: Vec<f64>,

    /// Resolution of output GeoTIFF DEM
    #[arg(short = 'r', long = "resolution", default_value_t = 0.1)]
    pub resolution: f64,

    /// Maximum number of tiles to generate, as a safety precaution against
    /// runaway memory use (0 = unlimited)
    #[arg(short = 'x', long = "max-tiles", default_value_t = 0)]
    pub max_tiles: u32,

    /// Directory to store results
    #[arg(short = 'u', long = "outdir", default_value = "output")]
    pub outdir: PathBuf,

    /// Overwrite existing results
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

impl Args {
    /// The input path, whichever way it was given.
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref().or(self.input_positional.as_ref())
    }
}
