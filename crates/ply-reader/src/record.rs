//! Point record decoding.

use std::io::{BufRead, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::header::{FieldKind, StreamHeader};

/// Longest ascii token accepted before the record is treated as malformed.
const MAX_TOKEN_LEN: usize = 64;

/// Decode one record into `values`, widening every field to `f64`.
///
/// Returns the number of fields actually decoded. Anything below
/// `header.field_count()` means end of data: a truncated binary record, a
/// token that is not a number, or end of stream. `values` must hold at least
/// `header.field_count()` slots.
pub fn decode_record<R: BufRead>(reader: &mut R, header: &StreamHeader, values: &mut [f64]) -> usize {
    if header.is_binary() {
        decode_binary(reader, header, values)
    } else {
        decode_ascii(reader, header.field_count(), values)
    }
}

fn decode_binary<R: Read>(reader: &mut R, header: &StreamHeader, values: &mut [f64]) -> usize {
    for (i, (field, slot)) in header.fields.iter().zip(values.iter_mut()).enumerate() {
        let value = match field.kind {
            FieldKind::Int8 => reader.read_i8().map(f64::from),
            FieldKind::UInt8 => reader.read_u8().map(f64::from),
            FieldKind::Int16 => reader.read_i16::<LittleEndian>().map(f64::from),
            FieldKind::UInt16 => reader.read_u16::<LittleEndian>().map(f64::from),
            FieldKind::Int32 => reader.read_i32::<LittleEndian>().map(f64::from),
            FieldKind::UInt32 => reader.read_u32::<LittleEndian>().map(f64::from),
            FieldKind::Float32 => reader.read_f32::<LittleEndian>().map(f64::from),
            FieldKind::Float64 => reader.read_f64::<LittleEndian>(),
        };
        match value {
            Ok(v) => *slot = v,
            Err(_) => return i,
        }
    }
    header.fields.len().min(values.len())
}

fn decode_ascii<R: BufRead>(reader: &mut R, count: usize, values: &mut [f64]) -> usize {
    let mut token = Vec::with_capacity(MAX_TOKEN_LEN);
    for (i, slot) in values.iter_mut().take(count).enumerate() {
        if !next_token(reader, &mut token) {
            return i;
        }
        let parsed = std::str::from_utf8(&token)
            .ok()
            .and_then(|s| s.parse::<f64>().ok());
        match parsed {
            Some(v) => *slot = v,
            None => return i,
        }
    }
    count.min(values.len())
}

/// Read the next whitespace delimited token into `token`.
fn next_token<R: BufRead>(reader: &mut R, token: &mut Vec<u8>) -> bool {
    token.clear();
    loop {
        let (used, done) = {
            let buf = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(_) => return false,
            };
            if buf.is_empty() {
                return !token.is_empty();
            }

            let mut used = 0;
            let mut done = false;
            for &b in buf {
                if b.is_ascii_whitespace() {
                    if !token.is_empty() {
                        done = true;
                        break;
                    }
                } else {
                    if token.len() >= MAX_TOKEN_LEN {
                        return false;
                    }
                    token.push(b);
                }
                used += 1;
            }
            (used, done)
        };
        reader.consume(used);
        if done {
            return true;
        }
    }
}

/// Iterates over the records of one stream, reusing a single value buffer.
///
/// Stops at the first short record, or after the declared vertex count.
pub struct RecordReader<'h, R> {
    reader: R,
    header: &'h StreamHeader,
    values: Vec<f64>,
    decoded: u64,
    finished: bool,
}

impl<'h, R: BufRead> RecordReader<'h, R> {
    /// `reader` must be positioned just after the header.
    pub fn new(reader: R, header: &'h StreamHeader) -> Self {
        Self {
            reader,
            header,
            values: vec![0.0; header.field_count()],
            decoded: 0,
            finished: header.field_count() == 0,
        }
    }

    /// The next record's values, in header field order.
    pub fn next_record(&mut self) -> Option<&[f64]> {
        if self.finished {
            return None;
        }
        if let Some(limit) = self.header.vertex_count {
            if self.decoded >= limit {
                self.finished = true;
                return None;
            }
        }

        let n = decode_record(&mut self.reader, self.header, &mut self.values);
        if n < self.values.len() {
            self.finished = true;
            return None;
        }
        self.decoded += 1;
        Some(self.values.as_slice())
    }

    /// Number of complete records returned so far.
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    pub fn header(&self) -> &StreamHeader {
        self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::parse_header;
    use std::io::Cursor;

    #[test]
    fn test_ascii_records_across_lines() {
        let text = "ply\nformat ascii 1.0\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 2 3\n4.5 -6e1\n7\n";
        let mut cursor = Cursor::new(text);
        let header = parse_header(&mut cursor).unwrap();
        let mut records = RecordReader::new(&mut cursor, &header);

        assert_eq!(records.next_record(), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(records.next_record(), Some(&[4.5, -60.0, 7.0][..]));
        assert_eq!(records.next_record(), None);
        assert_eq!(records.decoded(), 2);
    }

    #[test]
    fn test_ascii_garbage_ends_stream() {
        let text = "format ascii 1.0\nproperty float x\nproperty float y\nend_header\n1 2\n3 oops\n5 6\n";
        let mut cursor = Cursor::new(text);
        let header = parse_header(&mut cursor).unwrap();
        let mut records = RecordReader::new(&mut cursor, &header);

        assert!(records.next_record().is_some());
        assert!(records.next_record().is_none());
        assert!(records.next_record().is_none());
    }

    #[test]
    fn test_binary_truncated_record_counts_fields() {
        let mut data = b"format binary_little_endian 1.0\nproperty double x\nproperty float y\nproperty uchar c\nend_header\n".to_vec();
        data.extend_from_slice(&1.5f64.to_le_bytes());
        data.extend_from_slice(&2.5f32.to_le_bytes());
        data.push(200);
        data.extend_from_slice(&3.5f64.to_le_bytes());

        let mut cursor = Cursor::new(data);
        let header = parse_header(&mut cursor).unwrap();
        let mut values = vec![0.0; 3];

        assert_eq!(decode_record(&mut cursor, &header, &mut values), 3);
        assert_eq!(values, vec![1.5, 2.5, 200.0]);
        assert_eq!(decode_record(&mut cursor, &header, &mut values), 1);
    }

    #[test]
    fn test_vertex_count_limits_records() {
        let text = "format ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n1 2\n3 0 1 2\n";
        let mut cursor = Cursor::new(text);
        let header = parse_header(&mut cursor).unwrap();
        assert!(header.is_decodable());
        assert_eq!(header.field_count(), 2);

        let mut records = RecordReader::new(&mut cursor, &header);
        assert!(records.next_record().is_some());
        assert!(records.next_record().is_none());
    }
}
