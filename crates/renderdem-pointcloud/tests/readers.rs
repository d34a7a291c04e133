//! Reader integration tests against synthetic LAS and PLY files.

use renderdem_pointcloud::{read_point_set, PointCloudError};
use std::path::PathBuf;
use tempfile::TempDir;

const LAS_HEADER_SIZE: u16 = 227; // LAS 1.2 public header block

/// Build a minimal uncompressed LAS 1.2 file, point format 0.
///
/// `points` are (x, y, z, classification) tuples stored with a 0.01 scale.
fn write_las(dir: &TempDir, name: &str, points: &[(f64, f64, f64, u8)], wkt: Option<&str>) -> PathBuf {
    let vlr_payload = wkt.map(|w| {
        let mut p = w.as_bytes().to_vec();
        p.push(0);
        p
    });
    let vlr_len = vlr_payload.as_ref().map_or(0, |p| 54 + p.len());
    let point_offset = LAS_HEADER_SIZE as usize + vlr_len;

    let mut buf = vec![0u8; LAS_HEADER_SIZE as usize];
    buf[0..4].copy_from_slice(b"LASF");
    buf[24] = 1; // version major
    buf[25] = 2; // version minor
    buf[94..96].copy_from_slice(&LAS_HEADER_SIZE.to_le_bytes());
    buf[96..100].copy_from_slice(&(point_offset as u32).to_le_bytes());
    buf[100..104].copy_from_slice(&(u32::from(vlr_payload.is_some())).to_le_bytes());
    buf[104] = 0; // point format
    buf[105..107].copy_from_slice(&20u16.to_le_bytes()); // record length
    buf[107..111].copy_from_slice(&(points.len() as u32).to_le_bytes());
    for (i, scale) in [0.01f64; 3].iter().enumerate() {
        buf[131 + i * 8..139 + i * 8].copy_from_slice(&scale.to_le_bytes());
    }
    // x/y/z offsets stay zero.

    if let Some(payload) = vlr_payload {
        let mut vlr = vec![0u8; 54];
        vlr[2..2 + 15].copy_from_slice(b"LASF_Projection");
        vlr[18..20].copy_from_slice(&2112u16.to_le_bytes());
        vlr[20..22].copy_from_slice(&(payload.len() as u16).to_le_bytes());
        buf.extend_from_slice(&vlr);
        buf.extend_from_slice(&payload);
    }

    for &(x, y, z, cls) in points {
        let mut record = [0u8; 20];
        record[0..4].copy_from_slice(&((x / 0.01).round() as i32).to_le_bytes());
        record[4..8].copy_from_slice(&((y / 0.01).round() as i32).to_le_bytes());
        record[8..12].copy_from_slice(&((z / 0.01).round() as i32).to_le_bytes());
        record[15] = cls;
        buf.extend_from_slice(&record);
    }

    let path = dir.path().join(name);
    std::fs::write(&path, buf).expect("write LAS fixture");
    path
}

#[test]
fn test_las_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = write_las(
        &dir,
        "cloud.las",
        &[
            (1.0, 2.0, 10.0, 2),
            (3.5, 4.25, 11.0, 2),
            (-1.0, 0.5, 12.0, 5),
        ],
        None,
    );

    let pset = read_point_set(&path, -1, 1).expect("read LAS");
    assert_eq!(pset.len(), 3);
    assert!((pset.x[1] - 3.5).abs() < 1e-9);
    assert!((pset.y[1] - 4.25).abs() < 1e-9);
    assert!((pset.z[2] - 12.0).abs() < 1e-9);
    assert!((pset.extent.minx - -1.0).abs() < 1e-9);
    assert!((pset.extent.maxx - 3.5).abs() < 1e-9);
    assert!((pset.extent.miny - 0.5).abs() < 1e-9);
    assert!((pset.extent.maxy - 4.25).abs() < 1e-9);
    assert!(pset.srs.wkt.is_none());
}

#[test]
fn test_las_classification_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_las(
        &dir,
        "cloud.las",
        &[(0.0, 0.0, 1.0, 2), (1.0, 1.0, 2.0, 5), (2.0, 2.0, 3.0, 2)],
        None,
    );

    let pset = read_point_set(&path, 2, 1).expect("read LAS");
    assert_eq!(pset.len(), 2);
    assert!((pset.z[0] - 1.0).abs() < 1e-9);
    assert!((pset.z[1] - 3.0).abs() < 1e-9);
}

#[test]
fn test_las_decimation_keeps_every_nth() {
    let dir = TempDir::new().unwrap();
    let points: Vec<(f64, f64, f64, u8)> =
        (0..10).map(|i| (i as f64, 0.0, i as f64, 0)).collect();
    let path = write_las(&dir, "cloud.las", &points, None);

    let pset = read_point_set(&path, -1, 3).expect("read LAS");
    // Records 0, 3, 6, 9.
    assert_eq!(pset.len(), 4);
    assert!((pset.x[1] - 3.0).abs() < 1e-9);
    assert!((pset.x[3] - 9.0).abs() < 1e-9);
}

#[test]
fn test_las_wkt_srs() {
    let dir = TempDir::new().unwrap();
    let wkt = "PROJCS[\"WGS 84 / UTM zone 10N\"]";
    let path = write_las(&dir, "cloud.las", &[(0.0, 0.0, 1.0, 0)], Some(wkt));

    let pset = read_point_set(&path, -1, 1).expect("read LAS");
    assert_eq!(pset.srs.wkt.as_deref(), Some(wkt));
}

#[test]
fn test_las_empty_after_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_las(&dir, "cloud.las", &[(0.0, 0.0, 1.0, 1)], None);

    let err = read_point_set(&path, 2, 1).unwrap_err();
    assert!(matches!(err, PointCloudError::NoPoints { .. }));
}

#[test]
fn test_ply_ascii() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cloud.ply");
    std::fs::write(
        &path,
        "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nproperty uchar classification\nend_header\n0 0 1.5 2\n10 5 2.5 2\n20 10 3.5 6\n",
    )
    .unwrap();

    let pset = read_point_set(&path, -1, 1).expect("read PLY");
    assert_eq!(pset.len(), 3);
    assert!((pset.z[0] - 1.5).abs() < 1e-9);
    assert!((pset.extent.maxx - 20.0).abs() < 1e-9);

    // Classification property participates in filtering.
    let ground = read_point_set(&path, 2, 1).expect("read PLY");
    assert_eq!(ground.len(), 2);
}

#[test]
fn test_ply_without_classification_ignores_filter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cloud.ply");
    std::fs::write(
        &path,
        "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nend_header\n0 0 1\n1 1 2\n",
    )
    .unwrap();

    // No classification property declared: the filter cannot apply and all
    // points are kept.
    let pset = read_point_set(&path, 2, 1).expect("read PLY");
    assert_eq!(pset.len(), 2);
}

#[test]
fn test_ply_binary_little_endian() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cloud.ply");

    let mut buf = b"ply\nformat binary_little_endian 1.0\nelement vertex 2\nproperty double x\nproperty double y\nproperty float z\nend_header\n".to_vec();
    for &(x, y, z) in &[(1.25f64, 2.5f64, 3.0f32), (4.0, 5.0, 6.0)] {
        buf.extend_from_slice(&x.to_le_bytes());
        buf.extend_from_slice(&y.to_le_bytes());
        buf.extend_from_slice(&z.to_le_bytes());
    }
    std::fs::write(&path, buf).unwrap();

    let pset = read_point_set(&path, -1, 1).expect("read PLY");
    assert_eq!(pset.len(), 2);
    assert!((pset.x[0] - 1.25).abs() < 1e-9);
    assert!((pset.y[1] - 5.0).abs() < 1e-9);
    assert!((pset.z[1] - 6.0).abs() < 1e-9);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cloud.xyz");
    std::fs::write(&path, "0 0 0\n").unwrap();

    let err = read_point_set(&path, -1, 1).unwrap_err();
    assert!(matches!(err, PointCloudError::UnsupportedExtension(_)));
}

#[test]
fn test_laz_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cloud.laz");
    std::fs::write(&path, b"LASF").unwrap();

    let err = read_point_set(&path, -1, 1).unwrap_err();
    assert!(matches!(err, PointCloudError::Unsupported { .. }));
}

#[test]
fn test_zero_decimation_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_las(&dir, "cloud.las", &[(0.0, 0.0, 1.0, 0)], None);

    let err = read_point_set(&path, -1, 0).unwrap_err();
    assert!(matches!(err, PointCloudError::InvalidParameter(_)));
}
