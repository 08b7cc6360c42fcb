//! Splitting the raster columns into independent tiles.

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

/// An inclusive range of global raster columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub column_lo: usize,
    pub column_hi: usize,
}

impl TileRange {
    pub fn new(column_lo: usize, column_hi: usize) -> Self {
        Self {
            column_lo,
            column_hi,
        }
    }

    /// Number of columns in the tile.
    pub fn width(&self) -> usize {
        self.column_hi + 1 - self.column_lo
    }

    #[inline]
    pub fn contains(&self, column: usize) -> bool {
        column >= self.column_lo && column <= self.column_hi
    }
}

/// `tile_count + 1` boundary columns spread evenly over `[0, width - 1]`.
///
/// Boundary `i` is `floor(i * (width - 1) / tile_count + 0.5)`, evaluated in
/// integers so it is exact for any raster size.
fn boundaries(width: usize, tile_count: usize) -> Vec<usize> {
    let last = (width - 1) as u128;
    let n = tile_count as u128;
    (0..=n)
        .map(|i| ((2 * i * last + n) / (2 * n)) as usize)
        .collect()
}

/// Split `width` columns into `tile_count` contiguous, gapless tiles.
///
/// The first tile spans `[b0, b1]`; every later tile starts one past the end
/// of the previous one and ends at the next boundary, so the last tile ends
/// at `width - 1`. With as many tiles as columns each tile is one column.
/// Fails when some tile would be empty.
pub fn partition(width: usize, tile_count: usize) -> Result<Vec<TileRange>> {
    if width == 0 || tile_count == 0 || tile_count > width {
        return Err(RasterError::Partition {
            width,
            tiles: tile_count,
        });
    }
    if tile_count == width {
        return Ok((0..width).map(|c| TileRange::new(c, c)).collect());
    }

    let b = boundaries(width, tile_count);
    let mut ranges = Vec::with_capacity(tile_count);
    ranges.push(TileRange::new(b[0], b[1]));
    for i in 1..tile_count {
        let lo = ranges[i - 1].column_hi + 1;
        ranges.push(TileRange::new(lo, b[i + 1]));
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tile_is_full_range() {
        assert_eq!(partition(1, 1).unwrap(), vec![TileRange::new(0, 0)]);
        assert_eq!(partition(4, 1).unwrap(), vec![TileRange::new(0, 3)]);
        assert_eq!(partition(10_000, 1).unwrap(), vec![TileRange::new(0, 9_999)]);
    }

    #[test]
    fn test_even_split() {
        let ranges = partition(101, 4).unwrap();
        assert_eq!(
            ranges,
            vec![
                TileRange::new(0, 25),
                TileRange::new(26, 50),
                TileRange::new(51, 75),
                TileRange::new(76, 100),
            ]
        );
    }

    #[test]
    fn test_too_many_tiles() {
        assert!(partition(2, 3).is_err());
        assert!(partition(5, 6).is_err());
        assert!(partition(0, 1).is_err());
        assert!(partition(10, 0).is_err());
        assert!(partition(3, 2).is_ok());
    }

    #[test]
    fn test_one_column_per_tile() {
        assert_eq!(
            partition(2, 2).unwrap(),
            vec![TileRange::new(0, 0), TileRange::new(1, 1)]
        );
        let ranges = partition(5, 5).unwrap();
        assert_eq!(ranges.len(), 5);
        assert!(ranges.iter().enumerate().all(|(i, r)| *r == TileRange::new(i, i)));
    }

    #[test]
    fn test_boundaries_round_half_up() {
        // 9 / 2 = 4.5 rounds up.
        assert_eq!(boundaries(10, 2), vec![0, 5, 9]);
    }
}
