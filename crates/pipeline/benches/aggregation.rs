//! Benchmarks for multi-seed aggregation and ranking
//!
//! Run with: cargo bench --package pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use data_loader::{Artifacts, FeatureMatrix, MetadataTable, TitleIndex};
use knn_index::BruteForceIndex;
use pipeline::{aggregate, Ranker, DEFAULT_FAN_OUT};
use sources::{NeighborSource, SeedContext};
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

fn bench_aggregate_and_rank(c: &mut Criterion) {
    let source = synthetic_source();
    let ranker = Ranker::new();
    let mut group = c.benchmark_group("aggregate_and_rank");

    for seeds in [1usize, 5, 20] {
        let context = SeedContext::new((0..seeds).map(|i| format!("Movie {}", i * 137)));
        group.bench_with_input(BenchmarkId::from_parameter(seeds), &context, |b, context| {
            b.iter(|| {
                let scores = aggregate(&source, black_box(context), DEFAULT_FAN_OUT);
                black_box(ranker.rank(scores, context, 10))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate_and_rank);
criterion_main!(benches);
