//! # renderdem-pointcloud
//!
//! Point cloud readers and the in-memory point set model.
//!
//! Supported input formats:
//! - Uncompressed LAS 1.0-1.4 (`.las`); LAZ is rejected with a descriptive
//!   error.
//! - PLY, ASCII or binary little-endian (`.ply`).
//!
//! Reading applies an optional classification filter and a decimation stride
//! (keep every Nth record), and computes the global extent of the kept
//! points.
//!
//! ## Example
//!
//! ```no_run
//! use renderdem_pointcloud::read_point_set;
//!
//! // Keep ground points (classification 2), every point (decimation 1).
//! let pset = read_point_set("cloud.las", 2, 1)?;
//! println!("{} points, extent {:?}", pset.len(), pset.extent);
//! # Ok::<(), renderdem_pointcloud::PointCloudError>(())
//! ```

mod error;
mod extent;
mod las;
mod ply;
mod pointset;

pub use error::PointCloudError;
pub use extent::Extent;
pub use pointset::{read_point_set, PointSet, SpatialRef};

/// Result type for point cloud operations.
pub type Result<T> = std::result::Result<T, PointCloudError>;
