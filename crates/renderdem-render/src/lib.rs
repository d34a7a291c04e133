//! # renderdem-render
//!
//! Tiled DEM rasterization pipeline.
//!
//! Converts an in-memory point set into a gridded raster elevation surface,
//! bounding memory by splitting the work into spatial tiles. Each radius
//! setting produces an independent cover of the extent; each tile carries
//! radius-buffered bounds so interpolation near tile edges sees points
//! owned by neighboring tiles. Tiles are processed in parallel, one worker
//! task per tile, and empty tiles produce no file.
//!
//! ## Example
//!
//! ```no_run
//! use renderdem_pointcloud::read_point_set;
//! use renderdem_render::{render, RenderOptions};
//!
//! let pset = read_point_set("cloud.las", -1, 1)?;
//! let opts = RenderOptions {
//!     out_dir: "dem_tiles".into(),
//!     ..Default::default()
//! };
//! render(&pset, &opts)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod rasterize;
mod render;
mod tiler;

pub use error::RenderError;
pub use render::{render, render_tiles, RenderOptions};
pub use tiler::{plan_tiles, Tile, TilePlan, RES_FLOOR};

// Pipeline vocabulary re-exported for callers.
pub use renderdem_grid::Statistic;
pub use renderdem_pointcloud::Extent;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
