//! Temporary directory and file list helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::generators::SyntheticPly;

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Write `ply` to `dir/name` and return the full path.
pub fn write_ply(dir: &Path, name: &str, ply: &SyntheticPly) -> io::Result<PathBuf> {
    let path = dir.join(name);
    ply.write(&path)?;
    Ok(path)
}

/// Newline separated file list, as fed to the CLI on stdin.
pub fn file_list(paths: &[PathBuf]) -> String {
    let mut list = String::new();
    for path in paths {
        list.push_str(&path.to_string_lossy());
        list.push('\n');
    }
    list
}

/// Names of the files in `dir`, sorted.
pub fn list_dir(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}
