//! Shared test utilities for the plyflatten workspace.
//!
//! - [`generators`]: synthetic PLY clouds written in either encoding
//! - [`fixtures`]: zone tags, extents and the three-point scenario
//! - [`paths`]: scratch directories and stdin file lists
//!
//! Add to a crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Assert that two cell values differ by at most `tolerance`.
///
/// Both sides are widened to `f64`, so `f32` raster samples can be checked
/// against `f64` expectations directly. A NaN on either side fails.
///
/// ```ignore
/// assert_approx_eq!(raster.data[5], 150.0, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual = $actual as f64;
        let expected = $expected as f64;
        let tolerance = $tolerance as f64;
        if !((actual - expected).abs() <= tolerance) {
            panic!(
                "value {:?} is not within {:?} of {:?} ({} = {})",
                actual,
                tolerance,
                expected,
                stringify!($actual),
                actual
            );
        }
    }};
}

/// Assert that a raster cell holds the no-data value.
#[macro_export]
macro_rules! assert_nodata {
    ($value:expr) => {{
        let value: f64 = $value as f64;
        if !value.is_nan() {
            panic!("expected no-data (NaN), got `{:?}`", value);
        }
    }};
}
