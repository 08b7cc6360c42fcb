//! Error types shared across the workspace.

use thiserror::Error;

/// Result type alias using DsmError.
pub type DsmResult<T> = Result<T, DsmError>;

/// Errors raised while validating extents, zones and raster geometry.
#[derive(Debug, Error)]
pub enum DsmError {
    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("Invalid UTM zone: {0}")]
    InvalidZone(String),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Extent is empty: {0}")]
    EmptyExtent(String),
}

impl DsmError {
    /// Create an InvalidBbox error.
    pub fn invalid_bbox(msg: impl Into<String>) -> Self {
        Self::InvalidBbox(msg.into())
    }

    /// Create an InvalidZone error.
    pub fn invalid_zone(msg: impl Into<String>) -> Self {
        Self::InvalidZone(msg.into())
    }
}
