//! Criterion benchmarks for u-moea archives and variation pipelines.
//!
//! Uses synthetic objective vectors and real-coded solutions to measure
//! pure bookkeeping overhead independent of any problem.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_moea::archive::{EpsilonBoxDominanceArchive, NondominatedPopulation};
use u_moea::config::Properties;
use u_moea::random::create_rng;
use u_moea::solution::{Solution, Variable};
use u_moea::variation::{AdaptiveMultimethodVariation, OperatorRegistry};

// ===========================================================================
// Workloads
// ===========================================================================

/// Random points near the 2-objective front `f1 + f2 = 1`.
fn near_front(n: usize, seed: u64) -> Vec<Solution> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|_| {
            let x: f64 = rng.random();
            let noise: f64 = rng.random_range(0.0..0.2);
            Solution::from_objectives(vec![x + noise, 1.0 - x + noise])
        })
        .collect()
}

fn real_population(n: usize, dim: usize, seed: u64) -> Vec<Solution> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|_| {
            let vars = (0..dim)
                .map(|_| Variable::real(rng.random_range(0.0..1.0), 0.0, 1.0))
                .collect();
            Solution::new(vars, 2, 0)
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_archive_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_insertion");

    for &n in &[100usize, 1_000, 5_000] {
        let points = near_front(n, 42);

        group.bench_with_input(BenchmarkId::new("pareto", n), &points, |b, points| {
            b.iter(|| {
                let mut archive = NondominatedPopulation::new();
                archive.add_all(points.iter().cloned());
                black_box(archive.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("epsilon_0.01", n), &points, |b, points| {
            b.iter(|| {
                let mut archive = EpsilonBoxDominanceArchive::new(vec![0.01]).unwrap();
                archive.add_all(points.iter().cloned());
                black_box(archive.len())
            });
        });
    }

    group.finish();
}

fn bench_pipeline_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_throughput");
    let registry = OperatorRegistry::default();

    for name in ["sbx+pm", "pcx+pm"] {
        for &dim in &[10usize, 30, 100] {
            let variation = registry.build(name, &Properties::new(), dim).unwrap();
            let parents = real_population(100, dim, 7);

            group.bench_with_input(BenchmarkId::new(name, dim), &parents, |b, parents| {
                let mut rng = create_rng(42);
                b.iter(|| black_box(variation.evolve(parents, &mut rng).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_adaptive_selection(c: &mut Criterion) {
    let registry = OperatorRegistry::default();
    let mut amv = AdaptiveMultimethodVariation::new();
    for name in ["sbx+pm", "ux+um", "pm"] {
        amv.add_operator(registry.build(name, &Properties::new(), 30).unwrap());
    }
    let archive = real_population(500, 30, 3)
        .into_iter()
        .enumerate()
        .map(|(i, mut s)| {
            s.set_operator(Some(i % 3));
            s
        })
        .collect::<Vec<_>>();
    let parents = real_population(2, 30, 11);

    c.bench_function("adaptive_evolve", |b| {
        let mut rng = create_rng(42);
        b.iter(|| black_box(amv.evolve(&parents, &archive, &mut rng).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_archive_insertion,
    bench_pipeline_throughput,
    bench_adaptive_selection
);
criterion_main!(benches);
