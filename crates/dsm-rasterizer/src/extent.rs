//! First pass: the planar extent and reference UTM zone of all inputs.

use std::path::PathBuf;

use dsm_common::BoundingBox;
use ply_reader::HeaderOptions;
use serde::Serialize;
use tracing::{debug, info};

use crate::diagnostics::Diagnostic;
use crate::input::open_input;

/// Fields needed to locate a point: X and Y.
const PLANAR_FIELDS: usize = 2;

/// Result of scanning the inputs.
#[derive(Debug, Clone, Serialize)]
pub struct ExtentReport {
    /// Extent of every finite point read; empty if none was.
    pub bbox: BoundingBox,
    /// Zone tag of the first usable header, `None` if that header has none.
    pub zone_tag: Option<String>,
    /// Files whose header could be used.
    pub files_scanned: usize,
    /// Points folded into the extent.
    pub points: u64,
    /// Files that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtentReport {
    fn new() -> Self {
        Self {
            bbox: BoundingBox::empty(),
            zone_tag: None,
            files_scanned: 0,
            points: 0,
            diagnostics: Vec::new(),
        }
    }
}

/// Stream every record of every file, folding X and Y into the extent.
///
/// Unreadable files are reported and skipped.
pub fn scan_extent(files: &[PathBuf], options: &HeaderOptions) -> ExtentReport {
    let mut report = ExtentReport::new();

    for path in files {
        let mut ply = match open_input(path, options, PLANAR_FIELDS) {
            Ok(ply) => ply,
            Err(diagnostic) => {
                report.diagnostics.push(diagnostic);
                continue;
            }
        };
        if report.files_scanned == 0 {
            report.zone_tag = ply.header().zone_tag.clone();
        }
        report.files_scanned += 1;

        let mut records = ply.records();
        while let Some(values) = records.next_record() {
            let (x, y) = (values[0], values[1]);
            if x.is_finite() && y.is_finite() {
                report.bbox.extend(x, y);
                report.points += 1;
            }
        }
        debug!(path = %path.display(), records = records.decoded(), "Scanned extent");
    }

    info!(
        xmin = report.bbox.min_x,
        xmax = report.bbox.max_x,
        ymin = report.bbox.min_y,
        ymax = report.bbox.max_y,
        files = report.files_scanned,
        points = report.points,
        "Computed input extent"
    );

    report
}

/// Read headers up to the first usable one, whose zone tag is the reference.
///
/// Used when the extent is supplied by the caller and the full scan is skipped.
pub fn scan_zone(files: &[PathBuf], options: &HeaderOptions) -> ExtentReport {
    let mut report = ExtentReport::new();

    for path in files {
        match open_input(path, options, PLANAR_FIELDS) {
            Ok(ply) => {
                report.files_scanned += 1;
                report.zone_tag = ply.header().zone_tag.clone();
                break;
            }
            Err(diagnostic) => report.diagnostics.push(diagnostic),
        }
    }

    report
}
