//! Error types for PLY reading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by call sites that require a usable PLY header.
///
/// Record decoding itself never fails: a short or malformed record simply
/// ends the stream.
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no end_header line found in {path}")]
    MissingHeader { path: PathBuf },

    #[error("cannot decode records of {path}: {reason}")]
    UnsupportedLayout { path: PathBuf, reason: String },
}

impl PlyError {
    /// Create an UnsupportedLayout error.
    pub fn unsupported(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsupportedLayout {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for PLY operations.
pub type Result<T> = std::result::Result<T, PlyError>;
