//! Second pass: accumulate the points of one tile.
//!
//! Each tile re-reads every input file and keeps only the points whose
//! column falls inside the tile. Memory stays bounded by one tile grid at
//! the cost of one full pass over the inputs per tile, and tiles share no
//! state, so separate processes can compute them in parallel.

use std::path::{Path, PathBuf};

use dsm_common::{GridMapping, UtmZone};
use ply_reader::HeaderOptions;
use serde::Serialize;
use tracing::{debug, info};

use crate::accumulator::CellGrid;
use crate::config::AttributeSelector;
use crate::diagnostics::Diagnostic;
use crate::input::open_input;
use crate::partition::TileRange;

/// Everything a tile needs to be accumulated independently.
#[derive(Debug, Clone)]
pub struct TileJob {
    pub index: usize,
    pub range: TileRange,
    pub mapping: GridMapping,
    pub attribute: AttributeSelector,
    /// Zone every input is expected to carry.
    pub reference_zone: Option<String>,
    pub header_options: HeaderOptions,
}

/// What happened while accumulating one tile.
#[derive(Debug, Clone, Serialize)]
pub struct TileReport {
    pub index: usize,
    pub range: TileRange,
    /// Smallest easting among the accepted points.
    pub x_min: Option<f64>,
    pub files_read: usize,
    /// Records decoded across all files, inside the tile or not.
    pub points_seen: u64,
    pub points_accepted: u64,
    /// Records inside the tile whose coordinates or value were unusable,
    /// plus records with non-finite coordinates anywhere.
    pub rejected_points: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl TileReport {
    fn new(job: &TileJob) -> Self {
        Self {
            index: job.index,
            range: job.range,
            x_min: None,
            files_read: 0,
            points_seen: 0,
            points_accepted: 0,
            rejected_points: 0,
            diagnostics: Vec::new(),
        }
    }
}

/// Whether two zone tags name the same zone.
///
/// Tags that parse are compared as zones, so `31n` matches `31N`.
fn same_zone(expected: Option<&str>, found: Option<&str>) -> bool {
    match (expected, found) {
        (None, None) => true,
        (Some(a), Some(b)) => match (UtmZone::from_tag(a), UtmZone::from_tag(b)) {
            (Ok(za), Ok(zb)) => za == zb,
            _ => a == b,
        },
        _ => false,
    }
}

/// Accumulate one tile from every input file.
///
/// Files that cannot be used are skipped with a diagnostic. A file whose zone
/// differs from the reference is reported but its points are still
/// accumulated as they are.
pub fn accumulate_tile(job: &TileJob, files: &[PathBuf]) -> (CellGrid, TileReport) {
    let mut grid = CellGrid::new(job.range.width(), job.mapping.dims.height);
    let mut report = TileReport::new(job);

    for path in files {
        accumulate_file(job, path, &mut grid, &mut report);
    }

    info!(
        tile = job.index,
        columns = ?(job.range.column_lo, job.range.column_hi),
        files = report.files_read,
        accepted = report.points_accepted,
        rejected = report.rejected_points,
        cells = grid.observed_cells(),
        "Accumulated tile"
    );

    (grid, report)
}

fn accumulate_file(job: &TileJob, path: &Path, grid: &mut CellGrid, report: &mut TileReport) {
    let required = job.attribute.required_fields();
    let mut ply = match open_input(path, &job.header_options, required) {
        Ok(ply) => ply,
        Err(diagnostic) => {
            report.diagnostics.push(diagnostic);
            return;
        }
    };
    report.files_read += 1;

    let found = ply.header().zone_tag.clone();
    if !same_zone(job.reference_zone.as_deref(), found.as_deref()) {
        let diagnostic = Diagnostic::ZoneMismatch {
            path: path.to_path_buf(),
            expected: job.reference_zone.clone(),
            found,
        };
        diagnostic.emit();
        report.diagnostics.push(diagnostic);
    }

    let lo = job.range.column_lo;
    let mut records = ply.records();
    while let Some(values) = records.next_record() {
        report.points_seen += 1;

        let (x, y) = (values[0], values[1]);
        if !x.is_finite() || !y.is_finite() {
            report.rejected_points += 1;
            continue;
        }

        let col = job.mapping.column(x);
        if !job.range.contains(col) {
            continue;
        }

        let Some(value) = job.attribute.extract(values) else {
            report.rejected_points += 1;
            continue;
        };

        let row = job.mapping.row(y);
        grid.update(row, col - lo, value);
        report.points_accepted += 1;
        report.x_min = Some(report.x_min.map_or(x, |m| m.min(x)));
    }

    debug!(
        tile = job.index,
        path = %path.display(),
        records = records.decoded(),
        "Read input for tile"
    );
}
