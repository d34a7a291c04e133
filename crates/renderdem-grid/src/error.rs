//! Error types for the gridding kernel.

use thiserror::Error;

/// Errors that can occur when building or reading a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// Output statistic string is not one of the supported values.
    #[error("Unsupported output-type: {0}")]
    UnknownStatistic(String),

    /// Grid dimensions or resolution are unusable.
    #[error("Invalid grid geometry: {0}")]
    InvalidGeometry(String),

    /// Grid data was requested before finalization.
    #[error("Grid read before finalize()")]
    NotFinalized,
}
