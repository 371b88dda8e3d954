//! Flood-fill benchmarks on a synthetic coastal surface

use coastrisk_algorithms::flood::{apply_sea_wall, bathtub, connected, ConnectedParams};
use coastrisk_algorithms::vector::{vectorize_mask, VectorizeParams};
use coastrisk_core::{Crs, ElevationGrid, GeoTransform, Grid, SeaWall};
use criterion::{criterion_group, criterion_main, Criterion};

const SIZE: usize = 512;

/// Deterministic rolling terrain sloping toward the southern edge
fn synthetic_dem() -> ElevationGrid {
    let mut values = Vec::with_capacity(SIZE * SIZE);
    for row in 0..SIZE {
        for col in 0..SIZE {
            let base = 10.0 * (1.0 - row as f64 / SIZE as f64);
            let ripple = ((row as f64 * 0.11).sin() + (col as f64 * 0.07).cos()) * 1.5;
            values.push(base + ripple);
        }
    }
    Grid::from_vec(
        values,
        SIZE,
        SIZE,
        GeoTransform::new(0.0, SIZE as f64, 1.0, -1.0),
        Crs::utm(17, true),
    )
    .unwrap()
}

fn bench_flood(c: &mut Criterion) {
    let dem = synthetic_dem();

    c.bench_function("bathtub_512", |b| {
        b.iter(|| bathtub(&dem, 3.0).unwrap())
    });

    c.bench_function("connected_512", |b| {
        b.iter(|| connected(&dem, &ConnectedParams::at_level(3.0)).unwrap())
    });

    let wall = SeaWall::from_xy(&[(0.0, 120.0), (511.0, 140.0)], 12.0);
    c.bench_function("apply_wall_512", |b| {
        b.iter(|| apply_sea_wall(&dem, &wall).unwrap())
    });

    let mask = connected(&dem, &ConnectedParams::at_level(3.0)).unwrap();
    c.bench_function("vectorize_512", |b| {
        b.iter(|| vectorize_mask(&mask, &VectorizeParams::default()))
    });
}

criterion_group!(benches, bench_flood);
criterion_main!(benches);
