//! Criterion benchmarks for the TSP solvers.
//!
//! Uses seeded random asymmetric matrices so that runs are comparable
//! across machines and revisions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_tsp::bnb::{lower_bound, CursorTour};
use u_tsp::random::create_rng;
use u_tsp::sa::{InversionNeighborhood, SaConfig};
use u_tsp::{
    Algorithm, BranchAndBoundDfs, DistanceMatrix, ExhaustiveSearch, GaConfig, GeneticAlgorithm,
    SimulatedAnnealing, INFINITE_COST,
};

fn random_matrix(n: usize, seed: u64) -> DistanceMatrix {
    let mut rng = create_rng(seed);
    let cells = (0..n * n).map(|_| rng.random_range(1..1000)).collect();
    DistanceMatrix::new(n, n, cells).unwrap()
}

// ===========================================================================
// Exact solvers
// ===========================================================================

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    group.sample_size(10);

    for &n in &[6usize, 8, 9] {
        let m = random_matrix(n, 42);
        group.bench_with_input(BenchmarkId::new("bf", n), &m, |b, m| {
            b.iter(|| {
                let mut bf = ExhaustiveSearch::new(m.clone()).unwrap();
                bf.solve();
                black_box(bf.solution())
            })
        });
    }

    for &n in &[8usize, 10, 12] {
        let m = random_matrix(n, 42);
        group.bench_with_input(BenchmarkId::new("bnb", n), &m, |b, m| {
            b.iter(|| {
                let mut bnb = BranchAndBoundDfs::new(m.clone()).unwrap();
                bnb.solve();
                black_box(bnb.solution())
            })
        });
    }
    group.finish();
}

fn bench_lower_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("lower_bound");
    for &n in &[10usize, 50, 100] {
        let m = random_matrix(n, 7);
        let mut cursor = CursorTour::new(n);
        for city in 1..n / 2 {
            cursor.visit(city, &m);
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &(m, cursor), |b, (m, cursor)| {
            b.iter(|| lower_bound(black_box(m), black_box(cursor), n - 1, INFINITE_COST))
        });
    }
    group.finish();
}

// ===========================================================================
// Metaheuristics
// ===========================================================================

fn bench_sa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa");
    group.sample_size(10);
    for &n in &[20usize, 50, 100] {
        let m = random_matrix(n, 42);
        let config = SaConfig::default().with_epoch_size(200).with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(m, config), |b, (m, c)| {
            b.iter(|| {
                let mut sa = SimulatedAnnealing::new(m.clone(), c.clone())
                    .unwrap()
                    .with_neighborhood(InversionNeighborhood::new(0));
                sa.solve();
                black_box(sa.solution())
            })
        });
    }
    group.finish();
}

fn bench_ga(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga");
    group.sample_size(10);
    for (n, pop, gen) in [(20usize, 50usize, 100usize), (50, 100, 50), (100, 100, 30)] {
        let m = random_matrix(n, 42);
        let config = GaConfig {
            population_size: pop,
            pool_size: pop / 2,
            max_generations: gen,
            seed: Some(42),
            ..GaConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("p{}_g{}", pop, gen), n),
            &(m, config),
            |b, (m, c)| {
                b.iter(|| {
                    let mut ga = GeneticAlgorithm::new(m.clone(), c.clone()).unwrap();
                    ga.solve();
                    black_box(ga.solution())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_exact, bench_lower_bound, bench_sa, bench_ga);
criterion_main!(benches);
