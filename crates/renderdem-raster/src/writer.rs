//! GeoTIFF writing for single-band float rasters.

use crate::{RasterError, Result};
use std::fs::File;
use std::path::Path;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// Numeric id of GeoAsciiParamsTag, referenced from GeoKey directory
/// entries.
const TAG_GEO_ASCII_PARAMS: u16 = 34737;

/// GTCitationGeoKey id within the GeoKey directory.
const KEY_GT_CITATION: u16 = 1026;

/// No-data value stored in the output file. Distinct from the in-memory NaN
/// sentinel; NaN samples are rewritten to this on write.
pub const NODATA: f64 = -9999.0;

/// Parameters describing one output raster.
#[derive(Debug, Clone)]
pub struct RasterParams<'a> {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// GDAL-style affine pixel-to-map transform
    /// `[origin_x, pixel_width, 0, origin_y, 0, -pixel_height]`; the origin
    /// is the top-left (northwest) corner.
    pub transform: [f64; 6],
    /// Spatial reference WKT to record, if known.
    pub wkt: Option<&'a str>,
}

/// Write a single-band float32 GeoTIFF.
///
/// `data` is the band in row-major order with row 0 at the SOUTH edge (the
/// grid accumulator's layout); rows are flipped on write so the file is
/// north-up, matching the negative y pixel size in the transform. NaN
/// samples become [`NODATA`] in the file.
pub fn write_raster<P: AsRef<Path>>(path: P, params: &RasterParams, data: &[f64]) -> Result<()> {
    if params.width == 0 || params.height == 0 {
        return Err(RasterError::InvalidDimensions {
            width: params.width,
            height: params.height,
        });
    }
    if data.len() != params.width * params.height {
        return Err(RasterError::BandSizeMismatch {
            actual: data.len(),
            width: params.width,
            height: params.height,
        });
    }

    // South-up f64 in, north-up f32 out.
    let mut band = Vec::with_capacity(data.len());
    for row in (0..params.height).rev() {
        let start = row * params.width;
        band.extend(
            data[start..start + params.width]
                .iter()
                .map(|&v| if v.is_nan() { NODATA as f32 } else { v as f32 }),
        );
    }

    let file = File::create(path.as_ref())?;
    let mut encoder = TiffEncoder::new(file)?;
    let mut image =
        encoder.new_image::<colortype::Gray32Float>(params.width as u32, params.height as u32)?;

    let pixel_scale = [params.transform[1], -params.transform[5], 0.0];
    let tiepoint = [0.0, 0.0, 0.0, params.transform[0], params.transform[3], 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &pixel_scale[..])?;
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;
    image
        .encoder()
        .write_tag(Tag::GdalNodata, format!("{}", NODATA).as_str())?;

    if let Some(wkt) = params.wkt {
        // Minimal GeoKey directory: a single citation key pointing into the
        // ASCII params.
        let ascii = format!("{}|", wkt);
        let directory = [
            1u16,
            1,
            0,
            1,
            KEY_GT_CITATION,
            TAG_GEO_ASCII_PARAMS,
            ascii.len() as u16,
            0,
        ];
        image
            .encoder()
            .write_tag(Tag::GeoKeyDirectoryTag, &directory[..])?;
        image
            .encoder()
            .write_tag(Tag::GeoAsciiParamsTag, ascii.as_str())?;
    }

    image.write_data(&band)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tiff::decoder::{Decoder, DecodingResult};

    fn decode(path: &Path) -> (u32, u32, Vec<f32>, Decoder<File>) {
        let file = File::open(path).expect("open output");
        let mut decoder = Decoder::new(file).expect("decode output");
        let (w, h) = decoder.dimensions().expect("dimensions");
        let data = match decoder.read_image().expect("read image") {
            DecodingResult::F32(d) => d,
            other => panic!("unexpected sample format: {:?}", other),
        };
        (w, h, data, decoder)
    }

    #[test]
    fn test_write_flips_rows_and_replaces_nan() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.tif");

        // 2x2, south-up: bottom row [1, 2], top row [3, NaN].
        let data = [1.0, 2.0, 3.0, f64::NAN];
        let params = RasterParams {
            width: 2,
            height: 2,
            transform: [100.0, 0.5, 0.0, 201.0, 0.0, -0.5],
            wkt: None,
        };
        write_raster(&path, &params, &data).expect("write");

        let (w, h, pixels, _) = decode(&path);
        assert_eq!((w, h), (2, 2));
        // File row 0 is the north row.
        assert_eq!(pixels[0], 3.0);
        assert_eq!(pixels[1], NODATA as f32);
        assert_eq!(pixels[2], 1.0);
        assert_eq!(pixels[3], 2.0);
    }

    #[test]
    fn test_georeferencing_tags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.tif");

        let params = RasterParams {
            width: 3,
            height: 2,
            transform: [10.0, 0.25, 0.0, 55.0, 0.0, -0.25],
            wkt: Some("PROJCS[\"test\"]"),
        };
        write_raster(&path, &params, &vec![0.0; 6]).expect("write");

        let (_, _, _, mut decoder) = decode(&path);
        let scale = decoder
            .get_tag_f64_vec(Tag::ModelPixelScaleTag)
            .expect("pixel scale");
        assert_eq!(scale, vec![0.25, 0.25, 0.0]);
        let tiepoint = decoder
            .get_tag_f64_vec(Tag::ModelTiepointTag)
            .expect("tiepoint");
        assert_eq!(tiepoint, vec![0.0, 0.0, 0.0, 10.0, 55.0, 0.0]);
        let nodata = decoder
            .get_tag_ascii_string(Tag::GdalNodata)
            .expect("nodata");
        assert_eq!(nodata.trim_end_matches('\0'), "-9999");
        let ascii = decoder
            .get_tag_ascii_string(Tag::GeoAsciiParamsTag)
            .expect("geo ascii");
        assert!(ascii.contains("PROJCS"));
    }

    #[test]
    fn test_band_size_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.tif");
        let params = RasterParams {
            width: 2,
            height: 2,
            transform: [0.0, 1.0, 0.0, 2.0, 0.0, -1.0],
            wkt: None,
        };
        let err = write_raster(&path, &params, &[0.0; 3]).unwrap_err();
        assert!(matches!(err, RasterError::BandSizeMismatch { .. }));
    }
}
