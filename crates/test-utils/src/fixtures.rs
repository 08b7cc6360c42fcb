//! Common test fixtures for point cloud rasterization tests.

/// UTM zone tags as they appear in PLY projection comments.
pub mod zones {
    /// Western Europe (Paris)
    pub const PARIS: &str = "31N";

    /// Canary Islands
    pub const CANARIES: &str = "28N";

    /// Southern hemisphere (Sydney)
    pub const SYDNEY: &str = "56S";
}

/// Extents as `(xmin, xmax, ymin, ymax)`, the command line axis order.
pub mod extents {
    /// 30 m square at the origin; 4x4 cells at 10 m resolution
    pub const SMALL_SQUARE: (f64, f64, f64, f64) = (0.0, 30.0, 0.0, 30.0);

    /// A 1 km square in zone 31N
    pub const PARIS_KM: (f64, f64, f64, f64) = (452_000.0, 453_000.0, 5_411_000.0, 5_412_000.0);

    /// Single point (degenerate extent)
    pub const POINT: (f64, f64, f64, f64) = (100.0, 100.0, 200.0, 200.0);

    /// Format an extent for the `--bb` option.
    pub fn cli_string(extent: (f64, f64, f64, f64)) -> String {
        format!("{} {} {} {}", extent.0, extent.1, extent.2, extent.3)
    }
}

/// The three-point cloud used in end-to-end checks.
///
/// Rasterized at 10 m over [`extents::SMALL_SQUARE`], the cell holding
/// `(10, 10)` averages to 150 and the cell holding `(20, 20)` holds 50.
pub const THREE_POINTS: [(f64, f64, f64); 3] =
    [(10.0, 10.0, 100.0), (10.0, 10.0, 200.0), (20.0, 20.0, 50.0)];
