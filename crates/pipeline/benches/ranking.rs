//! Benchmarks for interpreting and ranking
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog about the size of MovieLens 1M so the numbers
//! don't depend on a downloaded dataset.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, Genre, RawItem, RawRating};
use pipeline::{GenreSet, PreferenceInterpreter, PreferenceQuery, Ranker, Recommender};
use std::sync::Arc;

fn synthetic_catalog(items: u32) -> Arc<Catalog> {
    let raw_items = (1..=items)
        .map(|id| {
            let first = Genre::ALL[id as usize % Genre::ALL.len()];
            let second = Genre::ALL[(id as usize * 7) % Genre::ALL.len()];
            RawItem::new(id, format!("Movie {} ({})", id, 1930 + id % 70), vec![first, second])
        })
        .collect();

    let raw_ratings = (1..=items)
        .flat_map(|id| {
            let count = (id * 31) % 300;
            (0..count).map(move |i| RawRating::new(id, 1.0 + ((id + i) % 5) as f32))
        })
        .collect();

    let (catalog, _) = Catalog::build(raw_items, raw_ratings).expect("Failed to build catalog");
    Arc::new(catalog)
}

fn bench_interpret(c: &mut Criterion) {
    let interpreter = PreferenceInterpreter::default();

    c.bench_function("interpret_preferences", |b| {
        b.iter(|| {
            let genres = interpreter
                .interpret(black_box("I want a tense crime thriller with some dark humor"));
            black_box(genres)
        })
    });
}

fn bench_rank(c: &mut Criterion) {
    let catalog = synthetic_catalog(4000);
    let ranker = Ranker::default();
    let matched = GenreSet::from([Genre::Crime, Genre::Thriller]);

    c.bench_function("rank_top_10", |b| {
        b.iter(|| {
            let ranked = ranker.rank(&catalog, black_box(&matched), black_box(10));
            black_box(ranked.len())
        })
    });
}

fn bench_recommend(c: &mut Criterion) {
    let recommender = Recommender::new(synthetic_catalog(4000));
    let query = PreferenceQuery::new("space adventure with a love story").with_k(10);

    c.bench_function("recommend_end_to_end", |b| {
        b.iter(|| {
            let result = recommender.recommend(black_box(&query));
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_interpret, bench_rank, bench_recommend);
criterion_main!(benches);
