//! Error type for the runner.

use thiserror::Error;

/// Errors surfaced to the command line user.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No input file was given.
    #[error("no input point cloud given")]
    MissingInput,

    /// Failed to read the input point cloud.
    #[error(transparent)]
    PointCloud(#[from] renderdem_pointcloud::PointCloudError),

    /// Unsupported output statistic.
    #[error(transparent)]
    Statistic(#[from] renderdem_grid::GridError),

    /// Pipeline failure.
    #[error(transparent)]
    Render(#[from] renderdem_render::RenderError),
}
