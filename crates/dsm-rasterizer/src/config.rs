//! Configuration for a rasterization run.

use std::path::PathBuf;

use dsm_common::BoundingBox;
use ply_reader::HeaderOptions;
use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

/// Record column holding the height.
pub const HEIGHT_COLUMN: usize = 2;

/// Highest record column that can be accumulated.
pub const MAX_ATTRIBUTE_COLUMN: usize = 5;

/// Output files are named `<prefix>_<tile>.tif`.
pub const DEFAULT_FILE_PREFIX: &str = "dsm";

/// Which record value is averaged into each cell.
///
/// Resolved once from the integer column selector so the per-point path
/// does not branch on the raw index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeSelector {
    /// Column 2, averaged as is. Non-finite heights are rejected.
    Height,
    /// Columns 3-5, truncated to an unsigned integer first (color channels).
    Channel(usize),
}

impl AttributeSelector {
    /// Resolve a column index: 2 is the height, 3 to 5 are channels.
    pub fn from_column(column: usize) -> Result<Self> {
        match column {
            HEIGHT_COLUMN => Ok(Self::Height),
            c if c > HEIGHT_COLUMN && c <= MAX_ATTRIBUTE_COLUMN => Ok(Self::Channel(c)),
            other => Err(RasterError::InvalidAttribute(other)),
        }
    }

    /// The record column this selector reads.
    pub fn column(&self) -> usize {
        match self {
            Self::Height => HEIGHT_COLUMN,
            Self::Channel(c) => *c,
        }
    }

    /// Number of record fields a file must declare to be usable.
    pub fn required_fields(&self) -> usize {
        self.column() + 1
    }

    /// The value to accumulate for one record, or `None` to reject the point.
    #[inline]
    pub fn extract(&self, record: &[f64]) -> Option<f64> {
        match *self {
            Self::Height => record.get(HEIGHT_COLUMN).copied().filter(|v| v.is_finite()),
            // Saturating cast: negatives and NaN become 0.
            Self::Channel(c) => record.get(c).map(|v| (*v as u32) as f64),
        }
    }
}

impl Default for AttributeSelector {
    fn default() -> Self {
        Self::Height
    }
}

/// Everything needed to turn a set of PLY files into tile rasters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Cell size in meters.
    pub resolution: f64,

    /// Number of column tiles the raster is split into.
    pub tile_count: usize,

    /// Directory receiving one GeoTIFF per tile.
    pub output_dir: PathBuf,

    /// Accumulated record value.
    pub attribute: AttributeSelector,

    /// Use this extent instead of scanning the inputs.
    pub bbox_override: Option<BoundingBox>,

    /// Compute a single tile instead of all of them.
    pub only_tile: Option<usize>,

    /// File name prefix for tile rasters.
    pub file_prefix: String,

    /// Reject headers declaring more than this many vertex fields.
    pub max_fields: Option<usize>,
}

impl RunConfig {
    /// A configuration with default attribute, prefix and no overrides.
    pub fn new(resolution: f64, tile_count: usize, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolution,
            tile_count,
            output_dir: output_dir.into(),
            attribute: AttributeSelector::default(),
            bbox_override: None,
            only_tile: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            max_fields: None,
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeSelector) -> Self {
        self.attribute = attribute;
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox_override = Some(bbox);
        self
    }

    pub fn with_only_tile(mut self, tile: usize) -> Self {
        self.only_tile = Some(tile);
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(RasterError::config(format!(
                "resolution must be > 0, got {}",
                self.resolution
            )));
        }

        if self.tile_count == 0 {
            return Err(RasterError::config("tile count must be >= 1"));
        }

        if let Some(tile) = self.only_tile {
            if tile >= self.tile_count {
                return Err(RasterError::config(format!(
                    "tile {} out of range for {} tiles",
                    tile, self.tile_count
                )));
            }
        }

        // Re-resolve in case the selector was deserialized.
        AttributeSelector::from_column(self.attribute.column())?;

        if let Some(bbox) = &self.bbox_override {
            bbox.validate()?;
        }

        if self.file_prefix.is_empty() || self.file_prefix.contains(std::path::MAIN_SEPARATOR) {
            return Err(RasterError::config(format!(
                "invalid file prefix '{}'",
                self.file_prefix
            )));
        }

        if self.max_fields == Some(0) {
            return Err(RasterError::config("max_fields must be > 0"));
        }

        Ok(())
    }

    /// Tiles this run computes, in order.
    pub fn selected_tiles(&self) -> Vec<usize> {
        match self.only_tile {
            Some(tile) => vec![tile],
            None => (0..self.tile_count).collect(),
        }
    }

    /// Output path of a tile raster.
    pub fn tile_path(&self, tile: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.tif", self.file_prefix, tile))
    }

    /// Header parsing limits derived from this configuration.
    pub fn header_options(&self) -> HeaderOptions {
        HeaderOptions {
            max_fields: self.max_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_from_column() {
        assert_eq!(AttributeSelector::from_column(2).unwrap(), AttributeSelector::Height);
        assert_eq!(
            AttributeSelector::from_column(4).unwrap(),
            AttributeSelector::Channel(4)
        );
        assert!(matches!(
            AttributeSelector::from_column(1),
            Err(RasterError::InvalidAttribute(1))
        ));
        assert!(matches!(
            AttributeSelector::from_column(6),
            Err(RasterError::InvalidAttribute(6))
        ));
    }

    #[test]
    fn test_extract_height_and_channel() {
        let record = [0.0, 0.0, 12.5, 200.7, -3.0, 255.0];
        assert_eq!(AttributeSelector::Height.extract(&record), Some(12.5));
        assert_eq!(AttributeSelector::Channel(3).extract(&record), Some(200.0));
        assert_eq!(AttributeSelector::Channel(4).extract(&record), Some(0.0));
        assert_eq!(AttributeSelector::Channel(5).extract(&record), Some(255.0));

        let bad = [0.0, 0.0, f64::NAN];
        assert_eq!(AttributeSelector::Height.extract(&bad), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RunConfig::new(0.0, 1, "/tmp").validate().is_err());
        assert!(RunConfig::new(1.0, 0, "/tmp").validate().is_err());
        assert!(RunConfig::new(1.0, 2, "/tmp").with_only_tile(2).validate().is_err());
        assert!(RunConfig::new(1.0, 2, "/tmp")
            .with_attribute(AttributeSelector::Channel(9))
            .validate()
            .is_err());
        assert!(RunConfig::new(0.5, 3, "/tmp").with_only_tile(2).validate().is_ok());
    }

    #[test]
    fn test_tile_paths() {
        let config = RunConfig::new(1.0, 3, "/out");
        assert_eq!(config.tile_path(2), PathBuf::from("/out/dsm_2.tif"));
        assert_eq!(config.selected_tiles(), vec![0, 1, 2]);
        assert_eq!(config.with_only_tile(1).selected_tiles(), vec![1]);
    }
}
