use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dataviz3d_core::{Point3f, SampleGrid, ValueRange};
use dataviz3d_surface::{MeshBuilder, Topology};

const GRID_SIZES: [usize; 3] = [64, 256, 512];
const RANGE: ValueRange = ValueRange::new(-1.0, 1.0);

fn wave(size: usize, phase: f32) -> SampleGrid {
    SampleGrid::from_fn(size, size, |c, r| {
        let (x, z) = (c as f32 / 16.0, r as f32 / 16.0);
        Point3f::new(x, (x + phase).sin() * (z - phase).cos(), z)
    })
    .unwrap()
}

fn build_full(c: &mut Criterion) {
    let mut g = c.benchmark_group("surface build_full");
    g.sample_size(10);

    for size in GRID_SIZES {
        let grid = wave(size, 0.0);
        for topology in [Topology::Smooth, Topology::Flat] {
            let id = BenchmarkId::new(format!("{:?}", topology), size);
            g.bench_with_input(id, &grid, |b, grid| {
                let mut builder = MeshBuilder::new();
                b.iter(|| {
                    builder
                        .build_full(std::hint::black_box(grid), grid.full_window(), RANGE, topology)
                        .map(|mesh| mesh.vertex_count())
                })
            });
        }
    }

    g.finish();
}

fn update_rows(c: &mut Criterion) {
    let mut g = c.benchmark_group("surface update_rows");

    for size in GRID_SIZES {
        let grid = wave(size, 0.5);
        let mut builder = MeshBuilder::new();
        builder
            .build_full(&grid, grid.full_window(), RANGE, Topology::Smooth)
            .unwrap();
        let middle = size / 2;

        g.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| builder.update_rows(std::hint::black_box(grid), middle, middle + 3, RANGE, Topology::Smooth))
        });
    }

    g.finish();
}

criterion_group!(benches, build_full, update_rows);
criterion_main!(benches);
