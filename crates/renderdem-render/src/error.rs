//! Error types for the rendering pipeline.

use thiserror::Error;

/// Errors that can occur while planning or rendering tiles.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Output directory already holds results and overwrite was not forced.
    #[error("{0} exists (use --force to overwrite results)")]
    OutputDirExists(String),

    /// Tile count exceeded the configured safety ceiling. Usually evidence
    /// of a failed upstream reconstruction producing a degenerate extent.
    #[error("Max tiles limit exceeded ({tiles} > {max}). This is a strong indicator that the reconstruction failed")]
    TooManyTiles {
        /// Tiles the plan would produce per radius.
        tiles: u64,
        /// Configured ceiling.
        max: u32,
    },

    /// Invalid pipeline parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error preparing the output directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Grid accumulation failure.
    #[error(transparent)]
    Grid(#[from] renderdem_grid::GridError),

    /// Raster write failure.
    #[error(transparent)]
    Raster(#[from] renderdem_raster::RasterError),
}
