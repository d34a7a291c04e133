//! Error types for point cloud reading.

use thiserror::Error;

/// Errors that can occur when reading a point cloud file.
#[derive(Debug, Error)]
pub enum PointCloudError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not one of the supported formats.
    #[error("Unsupported point cloud format: {0} (expected .las or .ply)")]
    UnsupportedExtension(String),

    /// Malformed or truncated file header.
    #[error("Invalid {format} header: {reason}")]
    InvalidHeader {
        /// File format being parsed ("LAS" or "PLY").
        format: &'static str,
        /// Description of what was wrong.
        reason: String,
    },

    /// File is compressed or uses a feature we do not decode.
    #[error("Unsupported {format} feature: {reason}")]
    Unsupported {
        /// File format being parsed ("LAS" or "PLY").
        format: &'static str,
        /// Description of the unsupported feature.
        reason: String,
    },

    /// Point record data ends before the declared point count.
    #[error("Truncated point data: expected {expected} records, file holds {actual}")]
    TruncatedData {
        /// Records declared by the header.
        expected: u64,
        /// Records actually present.
        actual: u64,
    },

    /// No points survived decimation and classification filtering.
    #[error("Point cloud is empty after filtering (classification={classification}, decimation={decimation})")]
    NoPoints {
        /// Classification filter that was applied (-1 = none).
        classification: i32,
        /// Decimation stride that was applied.
        decimation: u32,
    },

    /// Invalid reader parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
