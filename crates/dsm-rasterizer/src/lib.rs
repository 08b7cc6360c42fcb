//! Tiled rasterization of UTM point clouds into digital surface models.
//!
//! # Architecture
//!
//! A run makes one pass over the inputs to find the extent, splits the
//! raster columns into tiles, then makes one further pass per tile:
//!
//! - [`extent`]: bounding box and reference zone of all inputs
//! - [`partition`]: contiguous, gapless column ranges
//! - [`accumulator`]: per-cell running mean with NaN no-data
//! - [`driver`]: streams every file into one tile's grid
//! - [`writer`]: georeferenced GeoTIFF output
//! - [`pipeline`]: ties the passes together
//!
//! Problems with single input files never abort a run; they surface as
//! [`Diagnostic`]s in the extent and tile reports.

pub mod accumulator;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod extent;
mod input;
pub mod partition;
pub mod pipeline;
pub mod writer;

// Re-exports
pub use accumulator::{CellGrid, TileRaster, NODATA};
pub use config::{AttributeSelector, RunConfig, DEFAULT_FILE_PREFIX, HEIGHT_COLUMN};
pub use diagnostics::Diagnostic;
pub use driver::{accumulate_tile, TileJob, TileReport};
pub use error::{RasterError, Result};
pub use extent::{scan_extent, scan_zone, ExtentReport};
pub use partition::{partition, TileRange};
pub use pipeline::{Pipeline, RunSummary, TileSummary};
pub use writer::{GeoReference, GeoTiffWriter, RasterWriter};
