//! Error types for raster writing.

use thiserror::Error;

/// Errors that can occur when writing a raster file.
#[derive(Debug, Error)]
pub enum RasterError {
    /// I/O error creating or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF encoding error.
    #[error("TIFF encode error: {0}")]
    TiffEncode(#[from] tiff::TiffError),

    /// Band data does not match the declared raster dimensions.
    #[error("Band data length {actual} does not match {width}x{height} raster")]
    BandSizeMismatch {
        /// Supplied number of samples.
        actual: usize,
        /// Raster width in pixels.
        width: usize,
        /// Raster height in pixels.
        height: usize,
    },

    /// Raster dimensions are unusable.
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Raster width in pixels.
        width: usize,
        /// Raster height in pixels.
        height: usize,
    },
}
