//! PLY reader (ASCII and binary little-endian).
//!
//! Reads the `vertex` element's x/y/z properties, plus a `classification`
//! property when one is declared, skipping everything else.

use crate::pointset::{PointSetBuilder, SpatialRef};
use crate::{PointCloudError, PointSet, Result};
use std::path::Path;

fn header_err(reason: impl Into<String>) -> PointCloudError {
    PointCloudError::InvalidHeader {
        format: "PLY",
        reason: reason.into(),
    }
}

fn unsupported(reason: impl Into<String>) -> PointCloudError {
    PointCloudError::Unsupported {
        format: "PLY",
        reason: reason.into(),
    }
}

/// Scalar property types PLY files may declare.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl ScalarType {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "char" | "int8" => ScalarType::Int8,
            "uchar" | "uint8" => ScalarType::UInt8,
            "short" | "int16" => ScalarType::Int16,
            "ushort" | "uint16" => ScalarType::UInt16,
            "int" | "int32" => ScalarType::Int32,
            "uint" | "uint32" => ScalarType::UInt32,
            "float" | "float32" => ScalarType::Float32,
            "double" | "float64" => ScalarType::Float64,
            _ => return None,
        })
    }

    fn size(self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }

    /// Decode a little-endian value of this type to f64.
    fn decode(self, b: &[u8]) -> f64 {
        match self {
            ScalarType::Int8 => f64::from(b[0] as i8),
            ScalarType::UInt8 => f64::from(b[0]),
            ScalarType::Int16 => f64::from(i16::from_le_bytes([b[0], b[1]])),
            ScalarType::UInt16 => f64::from(u16::from_le_bytes([b[0], b[1]])),
            ScalarType::Int32 => f64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            ScalarType::UInt32 => f64::from(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            ScalarType::Float32 => f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            ScalarType::Float64 => f64::from_le_bytes([
                b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
            ]),
        }
    }
}

#[derive(Debug)]
struct Property {
    name: String,
    kind: ScalarType,
}

#[derive(Debug)]
struct Element {
    name: String,
    count: u64,
    properties: Vec<Property>,
    /// False when the element declares a list property (variable record size).
    fixed_size: bool,
}

impl Element {
    fn record_size(&self) -> usize {
        self.properties.iter().map(|p| p.kind.size()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Ascii,
    BinaryLittleEndian,
}

struct Header {
    format: Format,
    elements: Vec<Element>,
    /// Byte offset of the first body byte (past the end_header line).
    body_offset: usize,
}

fn parse_header(buf: &[u8]) -> Result<Header> {
    let mut format = None;
    let mut elements: Vec<Element> = Vec::new();
    let mut offset = 0usize;
    let mut first = true;

    loop {
        let rest = &buf[offset..];
        let eol = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| header_err("missing end_header"))?;
        let line = std::str::from_utf8(&rest[..eol])
            .map_err(|_| header_err("non-ASCII header line"))?
            .trim_end_matches('\r')
            .trim();
        offset += eol + 1;

        if first {
            if line != "ply" {
                return Err(header_err("missing ply magic"));
            }
            first = false;
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("comment") | Some("obj_info") | None => {}
            Some("format") => {
                format = match tokens.next() {
                    Some("ascii") => Some(Format::Ascii),
                    Some("binary_little_endian") => Some(Format::BinaryLittleEndian),
                    Some(other) => return Err(unsupported(format!("format {}", other))),
                    None => return Err(header_err("format line without a type")),
                };
            }
            Some("element") => {
                let name = tokens
                    .next()
                    .ok_or_else(|| header_err("element line without a name"))?;
                let count: u64 = tokens
                    .next()
                    .and_then(|c| c.parse().ok())
                    .ok_or_else(|| header_err(format!("element {} without a count", name)))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                    fixed_size: true,
                });
            }
            Some("property") => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| header_err("property before any element"))?;
                match tokens.next() {
                    Some("list") => element.fixed_size = false,
                    Some(type_name) => {
                        let kind = ScalarType::parse(type_name)
                            .ok_or_else(|| header_err(format!("unknown type {}", type_name)))?;
                        let name = tokens
                            .next()
                            .ok_or_else(|| header_err("property without a name"))?;
                        element.properties.push(Property {
                            name: name.to_string(),
                            kind,
                        });
                    }
                    None => return Err(header_err("property line without a type")),
                }
            }
            Some("end_header") => {
                let format = format.ok_or_else(|| header_err("missing format line"))?;
                return Ok(Header {
                    format,
                    elements,
                    body_offset: offset,
                });
            }
            Some(other) => return Err(header_err(format!("unknown keyword {}", other))),
        }
    }
}

/// Locations of the properties we read from a vertex record.
struct VertexLayout {
    x: usize,
    y: usize,
    z: usize,
    classification: Option<usize>,
}

impl VertexLayout {
    fn resolve(element: &Element) -> Result<Self> {
        let find = |name: &str| {
            element
                .properties
                .iter()
                .position(|p| p.name.eq_ignore_ascii_case(name))
        };
        let (Some(x), Some(y), Some(z)) = (find("x"), find("y"), find("z")) else {
            return Err(header_err("vertex element missing x/y/z properties"));
        };
        Ok(VertexLayout {
            x,
            y,
            z,
            classification: find("classification"),
        })
    }
}

pub(crate) fn read_ply(path: &Path, classification: i32, decimation: u32) -> Result<PointSet> {
    let buf = std::fs::read(path)?;
    let header = parse_header(&buf)?;

    let vertex_index = header
        .elements
        .iter()
        .position(|e| e.name == "vertex")
        .ok_or_else(|| header_err("no vertex element"))?;
    let vertex = &header.elements[vertex_index];
    if !vertex.fixed_size {
        return Err(unsupported("list property on the vertex element"));
    }
    let layout = VertexLayout::resolve(vertex)?;

    let mut builder = PointSetBuilder::new(classification);
    match header.format {
        Format::Ascii => read_ascii_body(
            &buf[header.body_offset..],
            &header.elements,
            vertex_index,
            &layout,
            decimation,
            &mut builder,
        )?,
        Format::BinaryLittleEndian => read_binary_body(
            &buf[header.body_offset..],
            &header.elements,
            vertex_index,
            &layout,
            decimation,
            &mut builder,
        )?,
    }

    // PLY carries no georeferencing.
    builder.build(SpatialRef::default(), decimation)
}

fn read_ascii_body(
    body: &[u8],
    elements: &[Element],
    vertex_index: usize,
    layout: &VertexLayout,
    decimation: u32,
    builder: &mut PointSetBuilder,
) -> Result<()> {
    let text = std::str::from_utf8(body).map_err(|_| header_err("non-ASCII body"))?;
    let mut lines = text.lines();

    for (index, element) in elements.iter().enumerate() {
        if index != vertex_index {
            for _ in 0..element.count {
                lines.next();
            }
            continue;
        }

        for i in 0..element.count {
            let line = lines.next().ok_or(PointCloudError::TruncatedData {
                expected: element.count,
                actual: i,
            })?;
            if i % u64::from(decimation) != 0 {
                continue;
            }

            let values: Vec<f64> = line
                .split_whitespace()
                .map(|t| t.parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| header_err(format!("bad vertex line: {}", line)))?;
            if values.len() < element.properties.len() {
                return Err(header_err(format!("short vertex line: {}", line)));
            }

            let cls = layout.classification.map(|c| values[c] as u8);
            builder.push(values[layout.x], values[layout.y], values[layout.z], cls);
        }
        // Elements after vertex are irrelevant.
        break;
    }
    Ok(())
}

fn read_binary_body(
    body: &[u8],
    elements: &[Element],
    vertex_index: usize,
    layout: &VertexLayout,
    decimation: u32,
    builder: &mut PointSetBuilder,
) -> Result<()> {
    // Skip fixed-size elements declared before vertex.
    let mut offset = 0usize;
    for element in &elements[..vertex_index] {
        if !element.fixed_size {
            return Err(unsupported(format!(
                "list-typed element {} before vertex in binary body",
                element.name
            )));
        }
        offset += element.record_size() * element.count as usize;
    }

    let vertex = &elements[vertex_index];
    let record_size = vertex.record_size();
    let available = body.len().saturating_sub(offset) / record_size.max(1);
    if (available as u64) < vertex.count {
        return Err(PointCloudError::TruncatedData {
            expected: vertex.count,
            actual: available as u64,
        });
    }

    // Byte offset of each property within a record.
    let mut property_offsets = Vec::with_capacity(vertex.properties.len());
    let mut acc = 0usize;
    for p in &vertex.properties {
        property_offsets.push(acc);
        acc += p.kind.size();
    }

    let read = |record: &[u8], index: usize| {
        let p = &vertex.properties[index];
        let off = property_offsets[index];
        p.kind.decode(&record[off..off + p.kind.size()])
    };

    let mut i: u64 = 0;
    while i < vertex.count {
        let base = offset + (i as usize) * record_size;
        let record = &body[base..base + record_size];
        let cls = layout.classification.map(|c| read(record, c) as u8);
        builder.push(
            read(record, layout.x),
            read(record, layout.y),
            read(record, layout.z),
            cls,
        );
        i += u64::from(decimation);
    }
    Ok(())
}
