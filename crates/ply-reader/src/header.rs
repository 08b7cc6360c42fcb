//! PLY header parsing.
//!
//! Recognized lines:
//! - `format ascii 1.0` / `format binary_little_endian 1.0`
//! - `element vertex <count>`
//! - `property <type> <name>`
//! - `comment projection: UTM <zone>`
//! - `end_header`
//!
//! Anything else is skipped. Elements other than `vertex` are only allowed
//! after it, or with a zero count, since their records would otherwise
//! precede the points.

use std::io::{self, BufRead};

/// How point records are encoded after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Whitespace separated decimal tokens
    #[default]
    Ascii,
    /// Packed little-endian values, fields in header order
    BinaryLittleEndian,
}

/// Scalar type of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl FieldKind {
    /// Parse a PLY type name, accepting both the classic and the sized spellings.
    pub fn from_ply_name(name: &str) -> Option<Self> {
        match name {
            "char" | "int8" => Some(Self::Int8),
            "uchar" | "uint8" => Some(Self::UInt8),
            "short" | "int16" => Some(Self::Int16),
            "ushort" | "uint16" => Some(Self::UInt16),
            "int" | "int32" => Some(Self::Int32),
            "uint" | "uint32" => Some(Self::UInt32),
            "float" | "float32" => Some(Self::Float32),
            "double" | "float64" => Some(Self::Float64),
            _ => None,
        }
    }

    /// Size of one value in a binary record.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }
}

/// One declared field of a point record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointFieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl PointFieldSpec {
    pub fn byte_width(&self) -> usize {
        self.kind.byte_width()
    }
}

/// Everything the header says about the records that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamHeader {
    /// Vertex fields in record order. Fields 0 and 1 are planar X and Y.
    pub fields: Vec<PointFieldSpec>,
    pub encoding: Encoding,
    /// Raw UTM designation from the projection comment, e.g. "31N"
    pub zone_tag: Option<String>,
    /// Declared vertex count, if the header has an `element vertex` line
    pub vertex_count: Option<u64>,
    /// Vertex properties that make the record layout undecodable
    pub unsupported: Vec<String>,
    /// Whether an `end_header` line was reached
    pub terminated: bool,
}

impl StreamHeader {
    pub fn is_binary(&self) -> bool {
        self.encoding == Encoding::BinaryLittleEndian
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Size in bytes of one binary record.
    pub fn record_width(&self) -> usize {
        self.fields.iter().map(|f| f.byte_width()).sum()
    }

    /// Position of a named field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// True when every vertex property has a known fixed width.
    pub fn is_decodable(&self) -> bool {
        self.unsupported.is_empty()
    }
}

/// Limits applied while parsing a header.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderOptions {
    /// Maximum number of vertex fields; extra declarations mark the header unsupported.
    pub max_fields: Option<usize>,
}

/// Parse a header with default options.
pub fn parse_header<R: BufRead>(reader: &mut R) -> io::Result<StreamHeader> {
    parse_header_with(reader, &HeaderOptions::default())
}

/// Consume header lines up to and including `end_header`.
///
/// Returns the header parsed so far when the stream ends first; callers that
/// need a complete header check [`StreamHeader::terminated`]. Only I/O
/// failures are errors.
pub fn parse_header_with<R: BufRead>(
    reader: &mut R,
    options: &HeaderOptions,
) -> io::Result<StreamHeader> {
    let mut header = StreamHeader::default();
    // Properties before any element line are treated as vertex properties.
    let mut in_vertex_element = true;
    let mut seen_vertex = false;
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&line);
        let tokens: Vec<&str> = text.split_whitespace().collect();

        match tokens.as_slice() {
            ["end_header", ..] => {
                header.terminated = true;
                break;
            }
            ["format", "ascii", ..] => header.encoding = Encoding::Ascii,
            ["format", "binary_little_endian", ..] => {
                header.encoding = Encoding::BinaryLittleEndian
            }
            ["format", other, ..] => header.unsupported.push(format!("format {}", other)),
            ["element", name, rest @ ..] => {
                let count: Option<u64> = rest.first().and_then(|n| n.parse().ok());
                in_vertex_element = *name == "vertex";
                if in_vertex_element {
                    header.vertex_count = count;
                    seen_vertex = true;
                } else if !seen_vertex && count != Some(0) {
                    // Its records would precede the vertices.
                    header
                        .unsupported
                        .push(format!("element {} before vertex", name));
                }
            }
            ["property", "list", ..] if in_vertex_element => {
                header.unsupported.push(text.trim().to_string());
            }
            ["property", type_name, name, ..] if in_vertex_element => {
                if options
                    .max_fields
                    .is_some_and(|max| header.fields.len() >= max)
                {
                    header
                        .unsupported
                        .push(format!("{} (field capacity exceeded)", name));
                    continue;
                }
                match FieldKind::from_ply_name(type_name) {
                    Some(kind) => header.fields.push(PointFieldSpec {
                        name: name.to_string(),
                        kind,
                    }),
                    None => header.unsupported.push(format!("{} {}", type_name, name)),
                }
            }
            ["comment", "projection:", "UTM", zone, ..] => {
                header.zone_tag = Some(zone.to_string());
            }
            _ => {}
        }
    }

    tracing::trace!(
        fields = header.fields.len(),
        binary = header.is_binary(),
        zone = ?header.zone_tag,
        terminated = header.terminated,
        "Parsed PLY header"
    );

    Ok(header)
}
