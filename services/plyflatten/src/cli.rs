//! Command line arguments and the input file list.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dsm_common::BoundingBox;
use dsm_rasterizer::{AttributeSelector, RunConfig, DEFAULT_FILE_PREFIX, HEIGHT_COLUMN};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "plyflatten")]
#[command(about = "Rasterize UTM PLY point clouds into tiled DSM GeoTIFFs")]
#[command(after_help = "Input PLY paths are read from stdin, one per line.")]
pub struct Args {
    /// Cell size in meters
    pub resolution: f64,

    /// Number of column tiles
    pub tiles: usize,

    /// Directory receiving <prefix>_<tile>.tif
    pub out_dir: PathBuf,

    /// Record column to average: 2 is the height, 3-5 are color channels
    #[arg(short = 'c', long, default_value_t = HEIGHT_COLUMN, env = "PLYFLATTEN_COLUMN")]
    pub column: usize,

    /// Extent as "xmin xmax ymin ymax"; skips the extent pass
    #[arg(
        long = "bb",
        value_name = "EXTENT",
        value_parser = parse_bbox,
        allow_hyphen_values = true,
        env = "PLYFLATTEN_BBOX"
    )]
    pub bbox: Option<BoundingBox>,

    /// Compute only this tile
    #[arg(long, env = "PLYFLATTEN_TILE")]
    pub tile: Option<usize>,

    /// Output file name prefix
    #[arg(long, default_value = DEFAULT_FILE_PREFIX, env = "PLYFLATTEN_PREFIX")]
    pub prefix: String,

    /// Skip files declaring more vertex fields than this
    #[arg(long, env = "PLYFLATTEN_MAX_FIELDS")]
    pub max_fields: Option<usize>,

    /// Print a JSON run summary on stdout
    #[arg(long)]
    pub manifest: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "PLYFLATTEN_LOG_LEVEL")]
    pub log_level: String,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "PLYFLATTEN_LOG_FORMAT")]
    pub log_format: LogFormat,
}

fn parse_bbox(s: &str) -> std::result::Result<BoundingBox, String> {
    BoundingBox::from_cli_string(s).map_err(|e| e.to_string())
}

impl Args {
    /// The run configuration these arguments describe.
    pub fn run_config(&self) -> Result<RunConfig> {
        let attribute = AttributeSelector::from_column(self.column)?;

        let mut config = RunConfig::new(self.resolution, self.tiles, &self.out_dir)
            .with_attribute(attribute)
            .with_file_prefix(&self.prefix);
        if let Some(bbox) = self.bbox {
            config = config.with_bbox(bbox);
        }
        if let Some(tile) = self.tile {
            config = config.with_only_tile(tile);
        }
        config.max_fields = self.max_fields;

        config.validate().context("invalid arguments")?;
        Ok(config)
    }
}

/// Non-empty lines of `reader`, each naming one input file.
///
/// Lines are taken as raw bytes, so paths need not be valid UTF-8.
pub fn read_file_list<R: BufRead>(mut reader: R) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let path = trim_ascii_whitespace(&line);
        if !path.is_empty() {
            files.push(path_from_bytes(path));
        }
    }
    Ok(files)
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["plyflatten", "0.5", "4", "/tmp/out"]).unwrap();
        let config = args.run_config().unwrap();
        assert_eq!(config.resolution, 0.5);
        assert_eq!(config.tile_count, 4);
        assert_eq!(config.attribute, AttributeSelector::Height);
        assert_eq!(config.file_prefix, "dsm");
        assert!(config.bbox_override.is_none());
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_bbox_and_column() {
        let args = Args::try_parse_from([
            "plyflatten",
            "1",
            "2",
            "/tmp/out",
            "--bb",
            "0 30 5 25",
            "-c",
            "3",
            "--tile",
            "1",
        ])
        .unwrap();
        let config = args.run_config().unwrap();
        assert_eq!(config.bbox_override, Some(BoundingBox::new(0.0, 5.0, 30.0, 25.0)));
        assert_eq!(config.attribute, AttributeSelector::Channel(3));
        assert_eq!(config.only_tile, Some(1));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Args::try_parse_from(["plyflatten", "1", "2", "/o", "--bb", "0 30 5"]).is_err());

        let bad_column = Args::try_parse_from(["plyflatten", "1", "2", "/o", "-c", "7"]).unwrap();
        assert!(bad_column.run_config().is_err());

        let bad_tile = Args::try_parse_from(["plyflatten", "1", "2", "/o", "--tile", "2"]).unwrap();
        assert!(bad_tile.run_config().is_err());
    }

    #[test]
    fn test_read_file_list_skips_blank_lines() {
        let input = "a.ply\n\n  b.ply \r\n\n";
        let files = read_file_list(input.as_bytes()).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.ply"), PathBuf::from("b.ply")]);
    }

    #[test]
    fn test_read_file_list_without_trailing_newline() {
        let files = read_file_list("a.ply\n   \nb.ply".as_bytes()).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.ply"), PathBuf::from("b.ply")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_file_list_keeps_non_utf8_paths() {
        use std::os::unix::ffi::OsStrExt;

        let input: &[u8] = b"a.ply\n/data/\xffcloud.ply\n";
        let files = read_file_list(input).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].as_os_str().as_bytes(), b"/data/\xffcloud.ply");
    }
}
