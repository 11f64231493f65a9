//! Benchmarks for similarity building
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog so the bench runs without the dataset file.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use data_loader::{Movie, MovieTable};
use pipeline::{build_similarity, SimilarityMatrix, TfidfVectorizer};

const GENRES: [u32; 19] = [
    12, 14, 16, 18, 27, 28, 35, 36, 37, 53, 80, 99, 878, 9648, 10402, 10749, 10751, 10752, 10770,
];

fn synthetic_table(size: usize) -> MovieTable {
    MovieTable::from_movies((0..size).map(|i| {
        // 1 to 3 genres, spread deterministically
        let genres = (0..(i % 3 + 1))
            .map(|k| GENRES[(i * 7 + k * 5) % GENRES.len()])
            .collect();
        Movie::new(i as u32, format!("Movie {}", i), genres)
    }))
}

fn bench_build_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_similarity");
    for size in [500usize, 2_000, 5_000] {
        let table = synthetic_table(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| black_box(build_similarity(black_box(table)).expect("non-empty vocabulary")))
        });
    }
    group.finish();
}

fn bench_similarity_only(c: &mut Criterion) {
    let table = synthetic_table(2_000);
    let features = TfidfVectorizer::new()
        .fit_transform(&table.genres_combined())
        .expect("non-empty vocabulary");

    c.bench_function("similarity_from_features_2000", |b| {
        b.iter(|| black_box(SimilarityMatrix::from_features(black_box(&features))))
    });
}

criterion_group!(benches, bench_build_similarity, bench_similarity_only);
criterion_main!(benches);
