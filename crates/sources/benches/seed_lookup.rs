//! Benchmarks for per-seed lookup
//!
//! Run with: cargo bench --package sources
//!
//! Uses a synthetic model so the benchmark does not depend on artifacts on disk.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Artifacts, FeatureMatrix, MetadataTable, TitleIndex};
use knn_index::BruteForceIndex;
use sources::NeighborSource;
use std::sync::Arc;

const ITEMS: usize = 5_000;
const DIMENSION: usize = 64;

fn synthetic_source() -> NeighborSource {
    let titles = (0..ITEMS).map(|i| format!("Movie {}", i)).collect();
    let rows = (0..ITEMS)
        .map(|i| {
            (0..DIMENSION)
                .map(|d| (((i * 31 + d * 17) % 97) as f32) / 97.0)
                .collect()
        })
        .collect();

    let artifacts = Arc::new(Artifacts::new(
        TitleIndex::new(titles),
        FeatureMatrix::from_rows(rows),
        MetadataTable::default(),
    ));
    let index = Arc::new(BruteForceIndex::new(artifacts.features.clone()));
    NeighborSource::new(artifacts, index)
}

fn bench_lookup_similar(c: &mut Criterion) {
    let source = synthetic_source();

    c.bench_function("lookup_similar_k5", |b| {
        b.iter(|| {
            let candidates = source.lookup_similar(black_box("Movie 42"), black_box(5));
            black_box(candidates)
        })
    });
}

fn bench_unknown_seed(c: &mut Criterion) {
    let source = synthetic_source();

    c.bench_function("lookup_unknown_seed", |b| {
        b.iter(|| {
            let candidates = source.lookup_similar(black_box("Not A Movie"), black_box(5));
            black_box(candidates)
        })
    });
}

criterion_group!(benches, bench_lookup_similar, bench_unknown_seed);
criterion_main!(benches);
