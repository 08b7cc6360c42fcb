//! End-to-end rasterization: extent, partition, accumulate, write.

use std::fs;
use std::path::PathBuf;

use dsm_common::{BoundingBox, DsmError, GridMapping, RasterDims, UtmZone, ZoneCode};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::diagnostics::Diagnostic;
use crate::driver::{accumulate_tile, TileJob, TileReport};
use crate::error::{RasterError, Result};
use crate::extent::{scan_extent, scan_zone, ExtentReport};
use crate::partition::partition;
use crate::writer::{GeoReference, GeoTiffWriter, RasterWriter};

/// One written tile.
#[derive(Debug, Clone, Serialize)]
pub struct TileSummary {
    pub path: PathBuf,
    pub georef: GeoReference,
    /// Cells holding a value.
    pub valid_cells: usize,
    pub report: TileReport,
}

/// Outcome of a run, printable as a JSON manifest.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub bbox: BoundingBox,
    pub dims: RasterDims,
    pub resolution: f64,
    pub zone_tag: Option<String>,
    pub zone_code: Option<ZoneCode>,
    /// Problems found while resolving the extent.
    pub extent_diagnostics: Vec<Diagnostic>,
    pub tiles: Vec<TileSummary>,
}

impl RunSummary {
    /// Every diagnostic raised during the run.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.extent_diagnostics
            .iter()
            .chain(self.tiles.iter().flat_map(|t| t.report.diagnostics.iter()))
    }

    /// Total points accumulated across tiles.
    pub fn points_accepted(&self) -> u64 {
        self.tiles.iter().map(|t| t.report.points_accepted).sum()
    }
}

/// Drives a full run against a raster sink.
pub struct Pipeline<W: RasterWriter = GeoTiffWriter> {
    config: RunConfig,
    writer: W,
}

impl Pipeline<GeoTiffWriter> {
    /// A pipeline writing GeoTIFF files.
    pub fn geotiff(config: RunConfig) -> Self {
        Self::new(config, GeoTiffWriter::new())
    }
}

impl<W: RasterWriter> Pipeline<W> {
    pub fn new(config: RunConfig, writer: W) -> Self {
        Self { config, writer }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The extent to rasterize and the reference zone.
    ///
    /// With a bounding box override only the headers are read.
    pub fn resolve_extent(&self, files: &[PathBuf]) -> Result<ExtentReport> {
        let options = self.config.header_options();
        let report = match self.config.bbox_override {
            Some(bbox) => {
                let mut report = scan_zone(files, &options);
                report.bbox = bbox;
                info!(
                    xmin = bbox.min_x,
                    xmax = bbox.max_x,
                    ymin = bbox.min_y,
                    ymax = bbox.max_y,
                    "Using supplied extent"
                );
                report
            }
            None => scan_extent(files, &options),
        };

        if report.bbox.is_empty() {
            return Err(DsmError::EmptyExtent(format!(
                "no readable points in {} input files",
                files.len()
            ))
            .into());
        }
        report.bbox.validate()?;
        Ok(report)
    }

    /// Rasterize `files` into one output per selected tile.
    pub fn run(&self, files: &[PathBuf]) -> Result<RunSummary> {
        self.config.validate()?;

        let extent = self.resolve_extent(files)?;
        let bbox = extent.bbox;
        let dims = bbox.raster_dims(self.config.resolution)?;
        let ranges = partition(dims.width, self.config.tile_count)?;
        info!(
            width = dims.width,
            height = dims.height,
            tiles = ranges.len(),
            "Raster geometry"
        );

        fs::create_dir_all(&self.config.output_dir).map_err(|source| RasterError::OutputDir {
            path: self.config.output_dir.clone(),
            source,
        })?;

        let zone_code = resolve_zone_code(extent.zone_tag.as_deref());
        let mapping = GridMapping::new(bbox, dims);

        let mut tiles = Vec::new();
        for index in self.config.selected_tiles() {
            let job = TileJob {
                index,
                range: ranges[index],
                mapping,
                attribute: self.config.attribute,
                reference_zone: extent.zone_tag.clone(),
                header_options: self.config.header_options(),
            };

            let (grid, report) = accumulate_tile(&job, files);
            let georef = GeoReference {
                origin_x: report
                    .x_min
                    .unwrap_or_else(|| mapping.column_left_edge(job.range.column_lo)),
                origin_y: bbox.max_y,
                pixel_scale: self.config.resolution,
                zone: zone_code,
            };

            let raster = grid.finalize();
            let path = self.config.tile_path(index);
            self.writer.write(&path, &raster, &georef)?;
            info!(tile = index, path = %path.display(), "Wrote tile");

            tiles.push(TileSummary {
                path,
                georef,
                valid_cells: raster.valid_cells(),
                report,
            });
        }

        Ok(RunSummary {
            bbox,
            dims,
            resolution: self.config.resolution,
            zone_tag: extent.zone_tag,
            zone_code,
            extent_diagnostics: extent.diagnostics,
            tiles,
        })
    }
}

/// The projected CRS of the reference zone, if it names one.
fn resolve_zone_code(tag: Option<&str>) -> Option<ZoneCode> {
    match tag.map(UtmZone::from_tag) {
        Some(Ok(zone)) => {
            info!(zone = %zone, code = %zone.code(), "Reference UTM zone");
            Some(zone.code())
        }
        Some(Err(e)) => {
            warn!(error = %e, "Outputs will carry no projected CRS");
            None
        }
        None => {
            warn!("No input declares a UTM zone; outputs will carry no projected CRS");
            None
        }
    }
}
