//! Error types for rasterization.
//!
//! Only run-level failures are errors. Problems with a single input file
//! are reported as [`crate::Diagnostic`]s and never abort a tile.

use std::path::PathBuf;

use dsm_common::DsmError;
use thiserror::Error;

/// Errors that abort a rasterization run.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Invalid run configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Attribute column selector outside the supported range.
    #[error("bad attribute column {0}: expected 2 (height) or 3-5 (channel)")]
    InvalidAttribute(usize),

    /// The raster cannot be split into the requested number of tiles.
    #[error("cannot split {width} columns into {tiles} non-empty tiles")]
    Partition { width: usize, tiles: usize },

    /// The output directory is missing and cannot be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tile file cannot be created or flushed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A raster buffer that does not match its dimensions.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// TIFF encoding failed for a tile file.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    /// TIFF encoding failed.
    #[error("TIFF encoding error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Extent, zone or raster geometry error.
    #[error(transparent)]
    Common(#[from] DsmError),

    /// Storage/IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RasterError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a Write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidRaster error.
    pub fn invalid_raster(msg: impl Into<String>) -> Self {
        Self::InvalidRaster(msg.into())
    }

    /// Attach the tile path to an encoding failure.
    pub fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Tiff(source) => Self::Encode {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_tiff_error_keeps_source() {
        let err: RasterError = tiff::TiffError::from(std::io::Error::other("disk full")).into();
        assert!(matches!(err, RasterError::Tiff(_)));

        let err = err.at_path("/out/dsm_0.tif");
        match &err {
            RasterError::Encode { path, .. } => assert_eq!(path, &PathBuf::from("/out/dsm_0.tif")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.source().is_some());
        assert!(err.to_string().contains("dsm_0.tif"));
    }

    #[test]
    fn test_at_path_leaves_other_errors() {
        let err = RasterError::invalid_raster("empty").at_path("/out/dsm_0.tif");
        assert!(matches!(err, RasterError::InvalidRaster(_)));
    }
}

/// Result type for rasterization operations.
pub type Result<T> = std::result::Result<T, RasterError>;
