//! Raster geometry: dimensions and the point-to-cell mapping.

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// Size of the full output raster, before tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterDims {
    /// Number of columns (easting direction)
    pub width: usize,
    /// Number of rows (northing direction, top row first)
    pub height: usize,
}

impl RasterDims {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Map `value` in `[min, max]` onto a cell index in `[0, n - 1]`.
///
/// Computes `floor(n * (value - min) / (max - min))` and clamps the result,
/// so values outside the range land in the nearest edge cell. A zero or
/// non-finite span maps everything to cell 0.
pub fn rescale_to_index(value: f64, min: f64, max: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let span = max - min;
    if !(span > 0.0) || !span.is_finite() {
        return 0;
    }

    let r = (n as f64 * (value - min) / span).floor();
    if r.is_nan() || r < 0.0 {
        0
    } else if r >= n as f64 {
        n - 1
    } else {
        r as usize
    }
}

/// Maps planar coordinates onto global raster cells.
///
/// Rows grow southwards: the top row holds the largest northings.
#[derive(Debug, Clone, Copy)]
pub struct GridMapping {
    pub bbox: BoundingBox,
    pub dims: RasterDims,
}

impl GridMapping {
    pub fn new(bbox: BoundingBox, dims: RasterDims) -> Self {
        Self { bbox, dims }
    }

    /// Global column of an easting.
    #[inline]
    pub fn column(&self, x: f64) -> usize {
        rescale_to_index(x, self.bbox.min_x, self.bbox.max_x, self.dims.width)
    }

    /// Global row of a northing.
    #[inline]
    pub fn row(&self, y: f64) -> usize {
        rescale_to_index(-y, -self.bbox.max_y, -self.bbox.min_y, self.dims.height)
    }

    /// Global `(column, row)` of a point.
    #[inline]
    pub fn cell(&self, x: f64, y: f64) -> (usize, usize) {
        (self.column(x), self.row(y))
    }

    /// Easting of the left edge of a column.
    pub fn column_left_edge(&self, column: usize) -> f64 {
        if self.dims.width == 0 {
            return self.bbox.min_x;
        }
        self.bbox.min_x + column as f64 * self.bbox.width() / self.dims.width as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_interior() {
        assert_eq!(rescale_to_index(10.0, 0.0, 30.0, 4), 1);
        assert_eq!(rescale_to_index(20.0, 0.0, 30.0, 4), 2);
    }

    #[test]
    fn test_rescale_clamps_to_edges() {
        assert_eq!(rescale_to_index(-100.0, 0.0, 30.0, 4), 0);
        assert_eq!(rescale_to_index(30.0, 0.0, 30.0, 4), 3);
        assert_eq!(rescale_to_index(1e9, 0.0, 30.0, 4), 3);
    }

    #[test]
    fn test_rescale_degenerate_span() {
        assert_eq!(rescale_to_index(5.0, 5.0, 5.0, 10), 0);
        assert_eq!(rescale_to_index(f64::NAN, 0.0, 1.0, 10), 0);
    }

    #[test]
    fn test_rows_are_north_up() {
        let mapping = GridMapping::new(
            BoundingBox::new(0.0, 0.0, 30.0, 30.0),
            RasterDims::new(4, 4),
        );
        assert_eq!(mapping.row(30.0), 0);
        assert_eq!(mapping.row(20.0), 1);
        assert_eq!(mapping.row(10.0), 2);
        assert_eq!(mapping.row(0.0), 3);
    }
}
