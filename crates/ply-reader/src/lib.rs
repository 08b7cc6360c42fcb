//! Streaming PLY point cloud reader.
//!
//! A PLY file is a self-describing header of newline-terminated ASCII lines
//! followed by one record per point, either as whitespace separated decimals
//! or as packed little-endian binary. This crate parses the header into a
//! [`StreamHeader`] and then decodes records one at a time into a reusable
//! buffer, so arbitrarily large clouds can be scanned in constant memory.
//!
//! ```ignore
//! use ply_reader::PlyFile;
//!
//! let mut ply = PlyFile::open("tile.ply")?;
//! let mut records = ply.records();
//! while let Some(values) = records.next_record() {
//!     let (x, y) = (values[0], values[1]);
//!     // ...
//! }
//! ```

pub mod error;
pub mod file;
pub mod header;
pub mod record;

pub use error::{PlyError, Result};
pub use file::PlyFile;
pub use header::{
    parse_header, parse_header_with, Encoding, FieldKind, HeaderOptions, PointFieldSpec,
    StreamHeader,
};
pub use record::{decode_record, RecordReader};
