//! Persisting finished tile rasters.

mod geotiff_writer;

use std::path::Path;

use dsm_common::ZoneCode;
use serde::Serialize;

use crate::accumulator::TileRaster;
use crate::error::Result;

pub use geotiff_writer::GeoTiffWriter;

/// Where a raster sits in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoReference {
    /// Easting of the left edge of the first column.
    pub origin_x: f64,
    /// Northing of the top edge of the first row.
    pub origin_y: f64,
    /// Cell size in both directions.
    pub pixel_scale: f64,
    /// Projected CRS, if the inputs named a valid zone.
    pub zone: Option<ZoneCode>,
}

/// Sink for tile rasters.
pub trait RasterWriter {
    /// Write `raster` to `path` with the given georeferencing.
    fn write(&self, path: &Path, raster: &TileRaster, georef: &GeoReference) -> Result<()>;
}
