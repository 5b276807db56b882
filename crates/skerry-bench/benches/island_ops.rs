//! Criterion micro-benchmarks for island discovery and its stages.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use skerry_arena::ArenaConfig;
use skerry_bench::{chain_graph, chain_profile, pairs_profile, scattered_profile};
use skerry_island::{discover_islands, flood_fill, CsrGraph};

/// Benchmark: label a 10K-vertex path graph.
fn bench_flood_fill_chain_10k(c: &mut Criterion) {
    let (rownnz, rowadr, colind) = chain_graph(10_000);
    let graph = CsrGraph::new(&rownnz, &rowadr, &colind);
    let mut island = vec![0; graph.nvertex()];
    let mut stack = vec![0; graph.nnz()];

    c.bench_function("flood_fill_chain_10k", |b| {
        b.iter(|| {
            let n = flood_fill(black_box(&graph), &mut island, &mut stack);
            black_box(n);
        });
    });
}

/// Benchmark: full discovery over 1K trees chained by pyramidal contacts.
fn bench_discover_chain_1k(c: &mut Criterion) {
    let s = chain_profile(1_000);
    let mut data = s.data(&ArenaConfig::default(), true);

    c.bench_function("discover_chain_1k", |b| {
        b.iter(|| {
            data.begin_step();
            discover_islands(&s.model, &mut data).unwrap();
            black_box(data.nisland());
        });
    });
}

/// Benchmark: full discovery over 1K trees in 500 two-tree islands.
fn bench_discover_pairs_1k(c: &mut Criterion) {
    let s = pairs_profile(500);
    let mut data = s.data(&ArenaConfig::default(), true);

    c.bench_function("discover_pairs_1k", |b| {
        b.iter(|| {
            data.begin_step();
            discover_islands(&s.model, &mut data).unwrap();
            black_box(data.nisland());
        });
    });
}

/// Benchmark: full discovery over a seeded mix of every row kind.
fn bench_discover_scattered_512(c: &mut Criterion) {
    let s = scattered_profile(42, 512);
    let mut data = s.data(&ArenaConfig::default(), true);

    c.bench_function("discover_scattered_512", |b| {
        b.iter(|| {
            data.begin_step();
            discover_islands(&s.model, &mut data).unwrap();
            black_box(data.nisland());
        });
    });
}

criterion_group!(
    benches,
    bench_flood_fill_chain_10k,
    bench_discover_chain_1k,
    bench_discover_pairs_1k,
    bench_discover_scattered_512
);
criterion_main!(benches);
