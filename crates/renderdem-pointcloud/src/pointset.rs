//! In-memory point set model and the reader entry point.

use crate::{Extent, PointCloudError, Result};
use std::path::Path;

/// Spatial reference descriptor attached to a point set.
///
/// Carried opaquely from the input file to the raster outputs. Point clouds
/// without georeferencing information produce rasters without one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialRef {
    /// Well-known text describing the coordinate reference system, if any.
    pub wkt: Option<String>,
}

impl SpatialRef {
    /// A spatial reference wrapping a WKT string.
    pub fn from_wkt<S: Into<String>>(wkt: S) -> Self {
        SpatialRef {
            wkt: Some(wkt.into()),
        }
    }
}

/// An unstructured 3D point cloud held as parallel coordinate arrays.
///
/// Read-only after ingestion; safe to share across worker threads by
/// reference.
#[derive(Debug)]
pub struct PointSet {
    /// X coordinates in projected map units.
    pub x: Vec<f64>,
    /// Y coordinates in projected map units.
    pub y: Vec<f64>,
    /// Z (elevation) values.
    pub z: Vec<f64>,
    /// Bounding box of the stored points.
    pub extent: Extent,
    /// Spatial reference of the coordinates.
    pub srs: SpatialRef,
}

impl PointSet {
    /// Number of points in the set.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Accumulates points that survive decimation and classification filtering.
///
/// Readers visit every `decimation`-th record and then offer it here together
/// with its classification code (if the format carries one).
pub(crate) struct PointSetBuilder {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    extent: Extent,
    classification: i32,
}

impl PointSetBuilder {
    pub(crate) fn new(classification: i32) -> Self {
        PointSetBuilder {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            extent: Extent::empty(),
            classification,
        }
    }

    /// Offer a visited record. Drops it when classification filtering is on
    /// and the record carries a non-matching code. Records without a
    /// classification code always pass; formats that lack the attribute
    /// cannot be filtered on it.
    pub(crate) fn push(&mut self, x: f64, y: f64, z: f64, classification: Option<u8>) {
        if self.classification >= 0 {
            if let Some(c) = classification {
                if i32::from(c) != self.classification {
                    return;
                }
            }
        }
        self.extent.expand_to(x, y);
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    pub(crate) fn build(self, srs: SpatialRef, decimation: u32) -> Result<PointSet> {
        if self.x.is_empty() {
            return Err(PointCloudError::NoPoints {
                classification: self.classification,
                decimation,
            });
        }
        Ok(PointSet {
            x: self.x,
            y: self.y,
            z: self.z,
            extent: self.extent,
            srs,
        })
    }
}

/// Read a point cloud file into a [`PointSet`].
///
/// The format is chosen by file extension: `.las` for uncompressed LAS,
/// `.ply` for ASCII or binary little-endian PLY.
///
/// * `classification` - keep only points with this classification code;
///   apply no filter when negative. The filter is a no-op for inputs that
///   carry no classification attribute (e.g. a PLY without a
///   `classification` property).
/// * `decimation` - visit every Nth point record (1 = all points).
pub fn read_point_set<P: AsRef<Path>>(
    path: P,
    classification: i32,
    decimation: u32,
) -> Result<PointSet> {
    let path = path.as_ref();
    if decimation == 0 {
        return Err(PointCloudError::InvalidParameter(
            "decimation must be >= 1".to_string(),
        ));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "las" => crate::las::read_las(path, classification, decimation),
        "laz" => Err(PointCloudError::Unsupported {
            format: "LAS",
            reason: "LAZ-compressed input is not supported, decompress to .las first".to_string(),
        }),
        "ply" => crate::ply::read_ply(path, classification, decimation),
        _ => Err(PointCloudError::UnsupportedExtension(
            path.display().to_string(),
        )),
    }
}
