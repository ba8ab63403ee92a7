//! Benchmarks for regularization, offsetting and filleting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use regpoly::{Point2, Polygon};

/// Generates a random walk closed into a contour.
fn generate_scribble(num_points: usize, seed: u64) -> Polygon {
    let mut points = Vec::with_capacity(num_points);
    let mut state = seed;

    for _ in 0..num_points {
        // Simple xorshift for deterministic "random" points
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let x = (state % 10_000) as f64 / 1000.0;
        let y = ((state >> 20) % 10_000) as f64 / 1000.0;
        points.push(Point2::new(x, y));
    }

    Polygon::from_points(&points).unwrap()
}

/// A zig-zag comb, regular but with many reflex corners.
fn generate_comb(teeth: usize) -> Polygon {
    let mut points = vec![Point2::new(0.0, 0.0), Point2::new(teeth as f64, 0.0)];
    for i in (0..teeth).rev() {
        let x = i as f64;
        points.push(Point2::new(x + 1.0, 3.0));
        points.push(Point2::new(x + 0.5, 1.0));
    }
    Polygon::from_points(&points).unwrap()
}

fn bench_regularize(c: &mut Criterion) {
    let mut group = c.benchmark_group("regularize");

    for size in [8, 32, 128] {
        let p = generate_scribble(size, 12345);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("scribble", size), &p, |b, p| {
            b.iter(|| black_box(p).regularize().unwrap())
        });
    }

    group.finish();
}

fn bench_offset_fillet(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset_fillet");

    for teeth in [10, 100, 500] {
        let comb = generate_comb(teeth);
        group.throughput(Throughput::Elements(comb.vertex_count() as u64));

        group.bench_with_input(BenchmarkId::new("offset_out", teeth), &comb, |b, p| {
            b.iter(|| black_box(p).offset_contour(0, black_box(0.1)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("offset_in", teeth), &comb, |b, p| {
            b.iter(|| black_box(p).offset_contour(0, black_box(-0.1)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("fillet_all", teeth), &comb, |b, p| {
            b.iter(|| black_box(p).fillet_all(black_box(0.1)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_regularize, bench_offset_fillet);
criterion_main!(benches);
