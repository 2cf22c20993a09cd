//! Criterion benchmarks for u-betweenness.
//!
//! Uses synthetic instances planted on a hidden ordering, so a zero-cost
//! solution always exists.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use u_betweenness::{cost, AnnealConfig, Annealer, Instance, MemoryCheckpointStore};

// ===========================================================================
// Planted instances
// ===========================================================================

/// `m` random constraints all satisfied by a shuffled hidden ordering.
fn planted(n: usize, m: usize, seed: u64) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut hidden: Vec<String> = (0..n).map(|i| format!("w{i}")).collect();
    hidden.shuffle(&mut rng);

    let mut constraints = Vec::with_capacity(m);
    while constraints.len() < m {
        let mut picks = [0usize; 3];
        for p in picks.iter_mut() {
            *p = rng.random_range(0..n);
        }
        picks.sort_unstable();
        let [lo, mid, hi] = picks;
        if lo == mid || mid == hi {
            continue;
        }
        // hidden[mid] lies between the others, so it may serve as A or B.
        let triple = if rng.random_bool(0.5) {
            [&hidden[lo], &hidden[mid], &hidden[hi]]
        } else {
            [&hidden[mid], &hidden[hi], &hidden[lo]]
        };
        constraints.push(triple.map(|s| s.clone()));
    }

    let mut names: Vec<String> = hidden;
    names.sort();
    Instance::new(names, constraints).expect("planted instance is valid")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_full_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_cost");

    for (n, m) in [(20usize, 100usize), (50, 500), (100, 2000)] {
        let instance = planted(n, m, 7);
        let ordering = instance.default_ordering();
        group.bench_with_input(BenchmarkId::new("vars", n), &n, |b, _| {
            b.iter(|| cost::cost(black_box(&ordering), instance.constraints()).unwrap())
        });
    }

    group.finish();
}

fn bench_anneal_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_pass");
    group.sample_size(10);

    for (n, m) in [(20usize, 100usize), (50, 500)] {
        let instance = planted(n, m, 11);
        let config = AnnealConfig::default()
            .with_min_temperature(1e-3)
            .with_alpha(0.99)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::new("vars", n), &n, |b, _| {
            b.iter(|| {
                let mut annealer = Annealer::from_config(config.clone()).unwrap();
                let mut store = MemoryCheckpointStore::new();
                annealer
                    .anneal(&instance, instance.default_ordering(), &mut store)
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_cost, bench_anneal_pass);
criterion_main!(benches);
