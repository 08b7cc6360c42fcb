//! Opening input files for a scan, with failures turned into diagnostics.

use std::path::Path;

use ply_reader::{HeaderOptions, PlyFile};

use crate::diagnostics::Diagnostic;

/// Open a PLY file whose records carry at least `required_fields` values.
///
/// The returned diagnostic has already been logged.
pub fn open_input(
    path: &Path,
    options: &HeaderOptions,
    required_fields: usize,
) -> Result<PlyFile, Diagnostic> {
    let ply = PlyFile::open_with(path, options).map_err(|e| {
        let diagnostic = Diagnostic::from_open_error(path, &e);
        diagnostic.emit();
        diagnostic
    })?;

    let declared = ply.header().field_count();
    if declared < required_fields {
        let diagnostic = Diagnostic::TooFewFields {
            path: path.to_path_buf(),
            declared,
            required: required_fields,
        };
        diagnostic.emit();
        return Err(diagnostic);
    }

    Ok(ply)
}
