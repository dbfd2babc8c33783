// Criterion benchmarks for Quiz Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use quiz_match::core::{compatibility_score, rank, CompatibilityEngine};
use quiz_match::models::{AnswerVector, QuizSchema, UserId};
use quiz_match::services::MemoryStore;
use std::collections::HashMap;
use std::sync::Arc;

const QUESTIONS: usize = 10;

fn create_answers(seed: usize) -> AnswerVector {
    AnswerVector::new((0..QUESTIONS).map(|q| ((seed * 7 + q * 3) % 4) as i32).collect())
}

fn create_corpus(size: usize) -> HashMap<UserId, AnswerVector> {
    (0..size)
        .map(|i| {
            let id = UserId::parse(&format!("user-{}", i)).expect("valid id");
            (id, create_answers(i))
        })
        .collect()
}

fn bench_compatibility_score(c: &mut Criterion) {
    let a = create_answers(1);
    let b = create_answers(2);

    c.bench_function("compatibility_score", |bench| {
        bench.iter(|| compatibility_score(black_box(&a), black_box(&b)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let me = UserId::parse("me").expect("valid id");
    let mine = create_answers(0);

    let mut group = c.benchmark_group("ranking");

    for corpus_size in [10, 100, 1000, 10000].iter() {
        let corpus = create_corpus(*corpus_size);

        group.bench_with_input(
            BenchmarkId::new("rank_top5", corpus_size),
            corpus_size,
            |b, _| {
                b.iter(|| rank(black_box(&me), black_box(&mine), black_box(&corpus), 5));
            },
        );
    }

    group.finish();
}

fn bench_compute_top(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let store = Arc::new(MemoryStore::new());
    let engine = CompatibilityEngine::new(
        store.clone(),
        store,
        QuizSchema {
            question_count: QUESTIONS,
            option_count: 4,
        },
    );

    runtime.block_on(async {
        for i in 0..500 {
            let id = UserId::parse(&format!("user-{}", i)).expect("valid id");
            engine
                .submit_answers(&id, create_answers(i).as_slice().to_vec())
                .await
                .expect("submit");
        }
    });

    let me = UserId::parse("user-0").expect("valid id");

    c.bench_function("compute_top_500_users", |b| {
        b.iter(|| runtime.block_on(engine.compute_top(black_box(&me), 5)));
    });
}

criterion_group!(
    benches,
    bench_compatibility_score,
    bench_ranking,
    bench_compute_top
);

criterion_main!(benches);
