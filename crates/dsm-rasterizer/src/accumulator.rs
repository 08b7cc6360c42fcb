//! Per-tile running mean grid.

use serde::Serialize;

/// Value written for cells that never received a point.
pub const NODATA: f32 = f32::NAN;

/// Running count and mean for every cell of one tile.
///
/// Cells are addressed by tile-local `(row, col)` and stored row-major.
#[derive(Debug, Clone)]
pub struct CellGrid {
    width: usize,
    height: usize,
    count: Vec<u32>,
    mean: Vec<f64>,
}

impl CellGrid {
    /// A zeroed grid of `width x height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            count: vec![0; len],
            mean: vec![0.0; len],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    /// Fold one sample into a cell: `mean' = (v + n * mean) / (n + 1)`.
    #[inline]
    pub fn update(&mut self, row: usize, col: usize, value: f64) {
        let k = self.index(row, col);
        let n = self.count[k] as f64;
        self.mean[k] = (value + n * self.mean[k]) / (n + 1.0);
        self.count[k] += 1;
    }

    /// Number of samples folded into a cell.
    pub fn count(&self, row: usize, col: usize) -> u32 {
        self.count[self.index(row, col)]
    }

    /// Current mean of a cell; zero while the cell is empty.
    pub fn mean(&self, row: usize, col: usize) -> f64 {
        self.mean[self.index(row, col)]
    }

    /// Cells that received at least one sample.
    pub fn observed_cells(&self) -> usize {
        self.count.iter().filter(|&&c| c > 0).count()
    }

    /// Resolve the grid into a raster, with [`NODATA`] for empty cells.
    pub fn finalize(self) -> TileRaster {
        let data = self
            .count
            .iter()
            .zip(&self.mean)
            .map(|(&n, &m)| if n == 0 { NODATA } else { m as f32 })
            .collect();

        TileRaster {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// A finished single-band raster, row-major, top row first.
#[derive(Debug, Clone, Serialize)]
pub struct TileRaster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl TileRaster {
    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Number of cells holding a value.
    pub fn valid_cells(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }
}
