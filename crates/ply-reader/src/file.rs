//! Opening PLY files from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{PlyError, Result};
use crate::header::{parse_header_with, HeaderOptions, StreamHeader};
use crate::record::RecordReader;

/// Read buffer size; records are small, so favour fewer syscalls.
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// An open PLY file positioned at its first record.
pub struct PlyFile {
    path: PathBuf,
    header: StreamHeader,
    reader: BufReader<File>,
}

impl PlyFile {
    /// Open a file and parse its header with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &HeaderOptions::default())
    }

    /// Open a file and parse its header.
    ///
    /// Fails when the file cannot be opened, when the header never reaches
    /// `end_header`, or when a vertex property has no fixed binary width.
    pub fn open_with(path: impl AsRef<Path>, options: &HeaderOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

        let header = parse_header_with(&mut reader, options)?;
        if !header.terminated {
            return Err(PlyError::MissingHeader { path });
        }
        if !header.is_decodable() {
            let reason = format!("unsupported properties: {}", header.unsupported.join(", "));
            return Err(PlyError::unsupported(path, reason));
        }

        Ok(Self {
            path,
            header,
            reader,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &StreamHeader {
        &self.header
    }

    /// Stream the remaining records.
    pub fn records(&mut self) -> RecordReader<'_, &mut BufReader<File>> {
        RecordReader::new(&mut self.reader, &self.header)
    }
}
