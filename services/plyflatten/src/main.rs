//! plyflatten: rasterize UTM point clouds into tiled DSM GeoTIFFs.
//!
//! Reads PLY paths from stdin, one per line, and writes one GeoTIFF per
//! column tile into the output directory. Logs go to stderr; with
//! `--manifest` a JSON run summary is printed on stdout.

mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use cli::{read_file_list, Args, LogFormat};
use dsm_rasterizer::Pipeline;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    let config = args.run_config()?;
    let files = read_file_list(io::stdin().lock()).context("failed to read file list from stdin")?;
    if files.is_empty() {
        warn!("No input files on stdin");
    }
    info!(
        files = files.len(),
        resolution = config.resolution,
        tiles = config.tile_count,
        out_dir = %config.output_dir.display(),
        "Starting rasterization"
    );

    let summary = Pipeline::geotiff(config)
        .run(&files)
        .context("rasterization failed")?;

    let skipped = summary.diagnostics().count();
    info!(
        tiles = summary.tiles.len(),
        points = summary.points_accepted(),
        diagnostics = skipped,
        "Done"
    );

    if args.manifest {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `--log-level`.
fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
