//! Benchmarks for boolean operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use regpoly::polygon::{OperationOptions, PolygonSet};
use regpoly::{Point2, Polygon};

/// A regular polygon with `n` vertices and a wobbly radius.
fn gear(center: Point2<f64>, n: usize, radius: f64) -> Polygon {
    let points: Vec<Point2<f64>> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            let r = if i % 2 == 0 { radius } else { 0.8 * radius };
            Point2::new(center.x + r * t.cos(), center.y + r * t.sin())
        })
        .collect();
    Polygon::from_points(&points)
        .and_then(|p| p.regularize())
        .map(|out| out.into_polygons().remove(0))
        .unwrap()
}

fn bench_pairwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");

    for size in [16, 64, 256, 1024] {
        let a = gear(Point2::new(0.0, 0.0), size, 1.0);
        let b = gear(Point2::new(0.5, 0.2), size, 1.0);
        group.throughput(Throughput::Elements(2 * size as u64));

        group.bench_with_input(BenchmarkId::new("union", size), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(a).union(black_box(b)).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("intersection", size),
            &(&a, &b),
            |bench, (a, b)| bench.iter(|| black_box(a).intersection(black_box(b)).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("difference", size),
            &(&a, &b),
            |bench, (a, b)| bench.iter(|| black_box(a).difference(black_box(b)).unwrap()),
        );
    }

    group.finish();
}

fn bench_arcs(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean_arcs");

    for count in [2, 8, 32] {
        let disks: Vec<Polygon> = (0..count)
            .map(|i| Polygon::circle(Point2::new(0.7 * i as f64, 0.0), 1.0).unwrap())
            .collect();
        group.throughput(Throughput::Elements(count as u64));

        let set = PolygonSet(disks);
        group.bench_with_input(BenchmarkId::new("unify_disks", count), &set, |bench, set| {
            bench.iter(|| black_box(set).unify(&OperationOptions::default()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pairwise, bench_arcs);
criterion_main!(benches);
