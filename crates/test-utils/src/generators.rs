//! Synthetic PLY point clouds for tests.
//!
//! Clouds are described in memory and written out in either encoding, so the
//! same points can be checked against both decoder paths.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

/// Record encoding of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyEncoding {
    Ascii,
    Binary,
}

/// An in-memory point cloud that can be written as a PLY file.
#[derive(Debug, Clone)]
pub struct SyntheticPly {
    /// (type name, property name) in record order
    properties: Vec<(String, String)>,
    zone: Option<String>,
    encoding: PlyEncoding,
    vertex_element: bool,
    extra_header_lines: Vec<String>,
    points: Vec<Vec<f64>>,
}

impl SyntheticPly {
    /// A cloud with the given properties and no points.
    pub fn new(properties: &[(&str, &str)]) -> Self {
        Self {
            properties: properties
                .iter()
                .map(|(t, n)| (t.to_string(), n.to_string()))
                .collect(),
            zone: None,
            encoding: PlyEncoding::Ascii,
            vertex_element: true,
            extra_header_lines: Vec::new(),
            points: Vec::new(),
        }
    }

    /// `double x, double y, double z`
    pub fn xyz() -> Self {
        Self::new(&[("double", "x"), ("double", "y"), ("double", "z")])
    }

    /// `double x, double y, double z, uchar red, uchar green, uchar blue`
    pub fn xyz_rgb() -> Self {
        Self::new(&[
            ("double", "x"),
            ("double", "y"),
            ("double", "z"),
            ("uchar", "red"),
            ("uchar", "green"),
            ("uchar", "blue"),
        ])
    }

    /// Set the UTM zone written in the projection comment.
    pub fn zone(mut self, tag: &str) -> Self {
        self.zone = Some(tag.to_string());
        self
    }

    pub fn ascii(mut self) -> Self {
        self.encoding = PlyEncoding::Ascii;
        self
    }

    pub fn binary(mut self) -> Self {
        self.encoding = PlyEncoding::Binary;
        self
    }

    pub fn encoding(mut self, encoding: PlyEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Omit the `element vertex N` line, as older writers do.
    pub fn without_vertex_element(mut self) -> Self {
        self.vertex_element = false;
        self
    }

    /// Add a raw header line before `end_header`.
    pub fn header_line(mut self, line: &str) -> Self {
        self.extra_header_lines.push(line.to_string());
        self
    }

    /// Append one point. Missing trailing values are written as zero.
    pub fn point(mut self, values: &[f64]) -> Self {
        self.points.push(values.to_vec());
        self
    }

    /// Append many `(x, y, z)` points.
    pub fn points_xyz<I: IntoIterator<Item = (f64, f64, f64)>>(mut self, points: I) -> Self {
        for (x, y, z) in points {
            self.points.push(vec![x, y, z]);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The header text, including the trailing `end_header` line.
    pub fn header_text(&self) -> String {
        let mut text = String::from("ply\n");
        match self.encoding {
            PlyEncoding::Ascii => text.push_str("format ascii 1.0\n"),
            PlyEncoding::Binary => text.push_str("format binary_little_endian 1.0\n"),
        }
        if let Some(zone) = &self.zone {
            text.push_str(&format!("comment projection: UTM {}\n", zone));
        }
        if self.vertex_element {
            text.push_str(&format!("element vertex {}\n", self.points.len()));
        }
        for (type_name, name) in &self.properties {
            text.push_str(&format!("property {} {}\n", type_name, name));
        }
        for line in &self.extra_header_lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str("end_header\n");
        text
    }

    /// Header and records as they would appear on disk.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = self.header_text().into_bytes();
        for point in &self.points {
            match self.encoding {
                PlyEncoding::Ascii => {
                    let tokens: Vec<String> = (0..self.properties.len())
                        .map(|i| format_ascii(point.get(i).copied().unwrap_or(0.0)))
                        .collect();
                    writeln!(out, "{}", tokens.join(" "))?;
                }
                PlyEncoding::Binary => {
                    for (i, (type_name, _)) in self.properties.iter().enumerate() {
                        let value = point.get(i).copied().unwrap_or(0.0);
                        write_binary_value(&mut out, type_name, value)?;
                    }
                }
            }
        }
        Ok(out)
    }

    /// Write the cloud to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.to_bytes()?)
    }
}

fn format_ascii(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn write_binary_value<W: Write>(out: &mut W, type_name: &str, value: f64) -> io::Result<()> {
    match type_name {
        "char" | "int8" => out.write_i8(value as i8),
        "uchar" | "uint8" => out.write_u8(value as u8),
        "short" | "int16" => out.write_i16::<LittleEndian>(value as i16),
        "ushort" | "uint16" => out.write_u16::<LittleEndian>(value as u16),
        "int" | "int32" => out.write_i32::<LittleEndian>(value as i32),
        "uint" | "uint32" => out.write_u32::<LittleEndian>(value as u32),
        "float" | "float32" => out.write_f32::<LittleEndian>(value as f32),
        "double" | "float64" => out.write_f64::<LittleEndian>(value),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot encode property type '{}'", other),
        )),
    }
}

/// Value stored at a cell by [`one_point_per_cell`]: `col * 1000 + row`.
///
/// Makes it easy to check that a value landed in the right cell.
pub fn cell_pattern_value(col: usize, row: usize) -> f64 {
    (col * 1000 + row) as f64
}

/// One `(x, y, z)` point at the center of every cell of a `width x height`
/// raster whose top-left corner is `(min_x, max_y)`, with `z` set to
/// [`cell_pattern_value`].
///
/// Row 0 is the northernmost row.
pub fn one_point_per_cell(
    min_x: f64,
    max_y: f64,
    cell_size: f64,
    width: usize,
    height: usize,
) -> Vec<(f64, f64, f64)> {
    let mut points = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x = min_x + (col as f64 + 0.5) * cell_size;
            let y = max_y - (row as f64 + 0.5) * cell_size;
            points.push((x, y, cell_pattern_value(col, row)));
        }
    }
    points
}
