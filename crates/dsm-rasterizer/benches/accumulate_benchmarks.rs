//! Benchmarks for the accumulate path: cell mapping, running mean, tile pass.
//!
//! Run with: cargo bench --package dsm-rasterizer --bench accumulate_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dsm_common::{BoundingBox, GridMapping};
use dsm_rasterizer::{accumulate_tile, partition, AttributeSelector, CellGrid, TileJob};
use ply_reader::HeaderOptions;
use rand::Rng;
use test_utils::{temp_test_dir, write_ply, SyntheticPly};

/// Random points over a `size x size` meter square.
fn generate_points(count: usize, size: f64) -> Vec<(f64, f64, f64)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            (
                rng.gen_range(0.0..size),
                rng.gen_range(0.0..size),
                rng.gen_range(0.0..300.0),
            )
        })
        .collect()
}

fn bench_cell_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_updates");
    let bbox = BoundingBox::new(0.0, 0.0, 1000.0, 1000.0);

    for resolution in [10.0, 1.0] {
        let dims = bbox.raster_dims(resolution).unwrap();
        let mapping = GridMapping::new(bbox, dims);
        let points = generate_points(100_000, 1000.0);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("map_and_update", format!("{}x{}", dims.width, dims.height)),
            &points,
            |b, points| {
                b.iter(|| {
                    let mut grid = CellGrid::new(dims.width, dims.height);
                    for &(x, y, z) in points {
                        let (col, row) = mapping.cell(x, y);
                        grid.update(row, col, z);
                    }
                    black_box(grid.observed_cells())
                });
            },
        );
    }

    group.finish();
}

fn bench_finalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("finalize");

    for size in [256usize, 1024] {
        let mut grid = CellGrid::new(size, size);
        for i in (0..size).step_by(3) {
            grid.update(i, i, i as f64);
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| black_box(grid.clone().finalize()));
        });
    }

    group.finish();
}

fn bench_tile_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_pass");
    group.sample_size(20);

    let dir = temp_test_dir();
    let points = generate_points(50_000, 500.0);
    let ply = SyntheticPly::xyz().binary().points_xyz(points.iter().copied());
    let files = vec![write_ply(dir.path(), "cloud.ply", &ply).unwrap()];

    let bbox = BoundingBox::new(0.0, 0.0, 500.0, 500.0);
    let dims = bbox.raster_dims(1.0).unwrap();
    let mapping = GridMapping::new(bbox, dims);
    group.throughput(Throughput::Elements(points.len() as u64));

    for tiles in [1usize, 4] {
        let ranges = partition(dims.width, tiles).unwrap();
        let job = TileJob {
            index: 0,
            range: ranges[0],
            mapping,
            attribute: AttributeSelector::Height,
            reference_zone: None,
            header_options: HeaderOptions::default(),
        };
        group.bench_with_input(BenchmarkId::new("first_tile_of", tiles), &job, |b, job| {
            b.iter(|| black_box(accumulate_tile(job, &files).1.points_accepted));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cell_updates, bench_finalize, bench_tile_pass);
criterion_main!(benches);
