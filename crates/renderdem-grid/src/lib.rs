//! # renderdem-grid
//!
//! Grid accumulation kernel for DEM rasterization.
//!
//! A [`GridAccumulator`] collects point elevations into a dense row-major
//! grid of cells, computing either the maximum z per cell or an
//! inverse-distance-weighted mean within a support radius. Untouched cells
//! hold a NaN sentinel.
//!
//! ## Example
//!
//! ```
//! use renderdem_grid::{GridAccumulator, Statistic};
//!
//! let mut grid = GridAccumulator::new(0.0, 0.0, 8, 8, 1.0, 0.56, Statistic::Max, 0, 1.0)?;
//! grid.add_point(3.2, 4.1, 102.5);
//! grid.finalize();
//! let data = grid.data()?;
//! assert_eq!(data.len(), 64);
//! # Ok::<(), renderdem_grid::GridError>(())
//! ```

mod error;
mod grid;

pub use error::GridError;
pub use grid::{GridAccumulator, Statistic};

/// Result type for gridding operations.
pub type Result<T> = std::result::Result<T, GridError>;
