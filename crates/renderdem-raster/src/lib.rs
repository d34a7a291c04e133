//! # renderdem-raster
//!
//! Single-band floating point GeoTIFF writer for DEM tiles.
//!
//! Writes float32 band data with GDAL-compatible georeferencing tags
//! (ModelPixelScale, ModelTiepoint, GDAL_NODATA) and an optional WKT
//! citation for the spatial reference.

mod error;
mod writer;

pub use error::RasterError;
pub use writer::{write_raster, RasterParams, NODATA};

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
