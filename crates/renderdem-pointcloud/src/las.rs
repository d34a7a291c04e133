//! Uncompressed LAS reader.
//!
//! Parses the fields of the LAS 1.0-1.4 public header block needed for
//! gridding: scale/offset, point record format and length, point count, and
//! the OGC WKT spatial reference VLR when present. Point records contribute
//! scaled x/y/z and the classification code.

use crate::pointset::{PointSetBuilder, SpatialRef};
use crate::{PointCloudError, PointSet, Result};
use std::path::Path;

const SIGNATURE: &[u8; 4] = b"LASF";

/// Fixed part of a variable length record header.
const VLR_HEADER_LEN: usize = 54;

/// OGC coordinate system WKT record (LASF_Projection / 2112).
const WKT_RECORD_ID: u16 = 2112;

fn header_err(reason: impl Into<String>) -> PointCloudError {
    PointCloudError::InvalidHeader {
        format: "LAS",
        reason: reason.into(),
    }
}

fn bytes_at<'a>(buf: &'a [u8], off: usize, len: usize) -> Result<&'a [u8]> {
    buf.get(off..off + len)
        .ok_or_else(|| header_err(format!("file truncated at offset {}", off)))
}

fn u16_at(buf: &[u8], off: usize) -> Result<u16> {
    let b = bytes_at(buf, off, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn u32_at(buf: &[u8], off: usize) -> Result<u32> {
    let b = bytes_at(buf, off, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn u64_at(buf: &[u8], off: usize) -> Result<u64> {
    let b = bytes_at(buf, off, 8)?;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

fn i32_at(buf: &[u8], off: usize) -> Result<i32> {
    let b = bytes_at(buf, off, 4)?;
    Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn f64_at(buf: &[u8], off: usize) -> Result<f64> {
    Ok(f64::from_bits(u64_at(buf, off)?))
}

/// Parsed LAS public header fields needed by the reader.
struct LasHeader {
    version_minor: u8,
    header_size: u16,
    point_offset: u32,
    vlr_count: u32,
    point_format: u8,
    record_len: u16,
    point_count: u64,
    scale: [f64; 3],
    offset: [f64; 3],
}

fn parse_header(buf: &[u8]) -> Result<LasHeader> {
    if bytes_at(buf, 0, 4)? != SIGNATURE {
        return Err(header_err("missing LASF signature"));
    }

    let version_minor = bytes_at(buf, 25, 1)?[0];
    let header_size = u16_at(buf, 94)?;
    let point_offset = u32_at(buf, 96)?;
    let vlr_count = u32_at(buf, 100)?;
    let point_format = bytes_at(buf, 104, 1)?[0];
    let record_len = u16_at(buf, 105)?;
    let legacy_count = u32_at(buf, 107)?;

    // LAS 1.4 moved the authoritative point count to a 64-bit field; the
    // legacy field is zero when the count does not fit.
    let point_count = if legacy_count == 0 && version_minor >= 4 && header_size >= 375 {
        u64_at(buf, 247)?
    } else {
        u64::from(legacy_count)
    };

    let scale = [f64_at(buf, 131)?, f64_at(buf, 139)?, f64_at(buf, 147)?];
    let offset = [f64_at(buf, 155)?, f64_at(buf, 163)?, f64_at(buf, 171)?];

    Ok(LasHeader {
        version_minor,
        header_size,
        point_offset,
        vlr_count,
        point_format,
        record_len,
        point_count,
        scale,
        offset,
    })
}

/// Scan the VLR block for an OGC WKT spatial reference.
fn read_srs(buf: &[u8], header: &LasHeader) -> SpatialRef {
    let mut off = header.header_size as usize;
    for _ in 0..header.vlr_count {
        let Ok(record_id) = u16_at(buf, off + 18) else {
            break;
        };
        let Ok(payload_len) = u16_at(buf, off + 20) else {
            break;
        };
        let user_id = match bytes_at(buf, off + 2, 16) {
            Ok(b) => b,
            Err(_) => break,
        };
        let payload = match bytes_at(buf, off + VLR_HEADER_LEN, payload_len as usize) {
            Ok(b) => b,
            Err(_) => break,
        };

        if user_id.starts_with(b"LASF_Projection") && record_id == WKT_RECORD_ID {
            // Null-terminated ASCII WKT.
            let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
            if let Ok(wkt) = std::str::from_utf8(&payload[..end]) {
                let wkt = wkt.trim();
                if !wkt.is_empty() {
                    return SpatialRef::from_wkt(wkt);
                }
            }
        }
        off += VLR_HEADER_LEN + payload_len as usize;
    }
    SpatialRef::default()
}

/// Byte offset of the classification field within a point record.
///
/// Formats 0-5 pack classification into the low five bits of byte 15;
/// formats 6-10 carry a full classification byte at offset 16.
fn classification_of(record: &[u8], point_format: u8) -> u8 {
    if point_format <= 5 {
        record[15] & 0x1f
    } else {
        record[16]
    }
}

/// Minimum record length that still contains x/y/z and classification.
fn min_record_len(point_format: u8) -> usize {
    if point_format <= 5 {
        16
    } else {
        17
    }
}

pub(crate) fn read_las(path: &Path, classification: i32, decimation: u32) -> Result<PointSet> {
    let buf = std::fs::read(path)?;
    let header = parse_header(&buf)?;

    if header.point_format & 0x80 != 0 {
        return Err(PointCloudError::Unsupported {
            format: "LAS",
            reason: "LAZ-compressed point records (decompress to .las first)".to_string(),
        });
    }
    if header.point_format > 10 {
        return Err(PointCloudError::Unsupported {
            format: "LAS",
            reason: format!("point data record format {}", header.point_format),
        });
    }
    if (header.record_len as usize) < min_record_len(header.point_format) {
        return Err(header_err(format!(
            "point record length {} too short for format {}",
            header.record_len, header.point_format
        )));
    }
    if header.version_minor > 4 {
        return Err(PointCloudError::Unsupported {
            format: "LAS",
            reason: format!("LAS version 1.{}", header.version_minor),
        });
    }

    let record_len = header.record_len as usize;
    let point_offset = header.point_offset as usize;
    let available = buf
        .len()
        .saturating_sub(point_offset)
        .checked_div(record_len)
        .unwrap_or(0) as u64;
    if available < header.point_count {
        return Err(PointCloudError::TruncatedData {
            expected: header.point_count,
            actual: available,
        });
    }

    let srs = read_srs(&buf, &header);
    let mut builder = PointSetBuilder::new(classification);

    let mut i: u64 = 0;
    while i < header.point_count {
        let base = point_offset + (i as usize) * record_len;
        let record = &buf[base..base + record_len];

        let x = f64::from(i32_at(record, 0)?) * header.scale[0] + header.offset[0];
        let y = f64::from(i32_at(record, 4)?) * header.scale[1] + header.offset[1];
        let z = f64::from(i32_at(record, 8)?) * header.scale[2] + header.offset[2];
        let cls = classification_of(record, header.point_format);

        builder.push(x, y, z, Some(cls));
        i += u64::from(decimation);
    }

    builder.build(srs, decimation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_signature() {
        let buf = vec![0u8; 400];
        assert!(matches!(
            parse_header(&buf),
            Err(PointCloudError::InvalidHeader { format: "LAS", .. })
        ));
    }

    #[test]
    fn test_classification_mask_legacy_formats() {
        let mut record = [0u8; 20];
        record[15] = 0b1110_0010; // flags set, class 2
        assert_eq!(classification_of(&record, 0), 2);
        assert_eq!(classification_of(&record, 5), 2);
    }

    #[test]
    fn test_classification_full_byte_new_formats() {
        let mut record = [0u8; 30];
        record[16] = 200;
        assert_eq!(classification_of(&record, 6), 200);
    }
}
