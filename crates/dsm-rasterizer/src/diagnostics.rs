//! Per-file problems that are reported but never abort a run.

use std::fmt;
use std::path::{Path, PathBuf};

use ply_reader::PlyError;
use serde::{Deserialize, Serialize};

/// A recoverable problem with one input file.
///
/// Each diagnostic is logged when raised and kept in the extent or tile
/// report so callers can inspect what was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The file could not be opened or its header never ended.
    FileUnreadable { path: PathBuf, reason: String },

    /// A vertex property has no fixed width, so records cannot be decoded.
    UnsupportedLayout { path: PathBuf, reason: String },

    /// The file declares fewer fields than the selected attribute needs.
    TooFewFields {
        path: PathBuf,
        declared: usize,
        required: usize,
    },

    /// The file's UTM zone differs from the run's reference zone.
    ///
    /// Its points are still accumulated without reprojection.
    ZoneMismatch {
        path: PathBuf,
        expected: Option<String>,
        found: Option<String>,
    },
}

impl Diagnostic {
    /// Classify a failure to open a PLY file.
    pub fn from_open_error(path: &Path, err: &PlyError) -> Self {
        match err {
            PlyError::UnsupportedLayout { reason, .. } => Self::UnsupportedLayout {
                path: path.to_path_buf(),
                reason: reason.clone(),
            },
            other => Self::FileUnreadable {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    /// The input file this diagnostic is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::FileUnreadable { path, .. }
            | Self::UnsupportedLayout { path, .. }
            | Self::TooFewFields { path, .. }
            | Self::ZoneMismatch { path, .. } => path,
        }
    }

    pub fn is_zone_mismatch(&self) -> bool {
        matches!(self, Self::ZoneMismatch { .. })
    }

    /// Log this diagnostic as a warning.
    pub fn emit(&self) {
        match self {
            Self::ZoneMismatch {
                path,
                expected,
                found,
            } => tracing::warn!(
                path = %path.display(),
                expected = expected.as_deref().unwrap_or("none"),
                found = found.as_deref().unwrap_or("none"),
                "Different UTM zones among input files; points are accumulated unprojected"
            ),
            other => tracing::warn!(path = %other.path().display(), "{}", other),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileUnreadable { path, reason } => {
                write!(f, "cannot read {}: {}", path.display(), reason)
            }
            Self::UnsupportedLayout { path, reason } => {
                write!(f, "skipping {}: {}", path.display(), reason)
            }
            Self::TooFewFields {
                path,
                declared,
                required,
            } => write!(
                f,
                "skipping {}: {} fields declared, {} required",
                path.display(),
                declared,
                required
            ),
            Self::ZoneMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "UTM zone of {} is {}, expected {}",
                path.display(),
                found.as_deref().unwrap_or("unset"),
                expected.as_deref().unwrap_or("unset")
            ),
        }
    }
}
