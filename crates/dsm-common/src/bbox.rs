//! Planar bounding box of a set of UTM point clouds.

use serde::{Deserialize, Serialize};

use crate::error::{DsmError, DsmResult};
use crate::grid::RasterDims;

/// A planar bounding box in projected (UTM) coordinates, in meters.
///
/// `min_x <= max_x` and `min_y <= max_y` hold for any box that has seen at
/// least one point. Equal bounds are allowed: a single point, or a line of
/// points, produces a degenerate box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// An inverted box that any call to [`BoundingBox::extend`] will replace.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Parse the command line override: "xmin xmax ymin ymax", whitespace separated.
    ///
    /// Note the axis order differs from [`BoundingBox::new`].
    pub fn from_cli_string(s: &str) -> DsmResult<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != 4 {
            return Err(DsmError::invalid_bbox(format!(
                "'{}'. Expected 'xmin xmax ymin ymax'",
                s
            )));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| DsmError::invalid_bbox(format!("invalid number '{}'", part)))?;
        }

        let bbox = Self::new(values[0], values[2], values[1], values[3]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Fold one point into the box.
    pub fn extend(&mut self, x: f64, y: f64) {
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    /// Merge another box into this one.
    pub fn union(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// True until at least one point has been folded in.
    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    /// Check that all bounds are finite and ordered.
    pub fn validate(&self) -> DsmResult<()> {
        let all_finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(DsmError::EmptyExtent(format!(
                "bounds are not finite: {:?}",
                self
            )));
        }
        if self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(DsmError::invalid_bbox(format!(
                "min exceeds max: x [{}, {}], y [{}, {}]",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Raster dimensions covering this box at `resolution` meters per cell.
    ///
    /// `1 + floor(extent / resolution)` along each axis, so a degenerate box
    /// still yields a single row or column.
    pub fn raster_dims(&self, resolution: f64) -> DsmResult<RasterDims> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(DsmError::InvalidResolution(format!(
                "{} (must be a positive number)",
                resolution
            )));
        }
        self.validate()?;

        let cells = |extent: f64| -> DsmResult<usize> {
            let n = (extent / resolution).floor();
            if n >= (u32::MAX as f64) {
                return Err(DsmError::InvalidResolution(format!(
                    "{} m over {} m yields too many cells",
                    resolution, extent
                )));
            }
            Ok(1 + n as usize)
        };

        Ok(RasterDims::new(cells(self.width())?, cells(self.height())?))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
