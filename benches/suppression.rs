use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reply_throttle::{DamerauLevenshtein, DuplicateReplySuppressor, ExactMatch, SimilarityOracle};
use std::sync::Arc;
use std::time::Duration;

/// Benchmark the similarity oracles on typical query lengths
fn bench_oracles(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle_distance");

    let pairs = [
        ("short", "光炮 1", "光炮1"),
        ("medium", "計算經驗 光炮 1 0 21", "計算經驗 光炮 2 0 21"),
        (
            "long",
            "計算經驗\n光炮 1 0 21\n守衛 3 20 21\n弓兵 5 10 21",
            "計算經驗\n光炮 1 0 21\n守衛 3 20 21\n弓兵 6 10 21",
        ),
    ];

    for (name, a, b) in pairs {
        let input = (a, b);
        group.bench_with_input(
            BenchmarkId::new("damerau_levenshtein", name),
            &input,
            |bench, (a, b)| bench.iter(|| DamerauLevenshtein.distance(black_box(a), black_box(b))),
        );
        group.bench_with_input(
            BenchmarkId::new("exact_match", name),
            &input,
            |bench, (a, b)| bench.iter(|| ExactMatch.distance(black_box(a), black_box(b))),
        );
    }

    group.finish();
}

/// Benchmark a check against windows of increasing size
fn bench_check_window_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_window_size");

    for size in [10, 100, 1_000] {
        let suppressor = DuplicateReplySuppressor::builder()
            .with_expiry(Duration::from_secs(3600))
            .build()
            .unwrap();
        for i in 0..size {
            suppressor.should_suppress(&format!("光炮 {i}"), "10分鐘");
        }

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            // Same reply as every entry, so each stored query is compared
            b.iter(|| suppressor.check(black_box("完全不同的查詢"), black_box("10分鐘")))
        });
    }

    group.finish();
}

/// Benchmark repeated duplicates, the common case in a busy group
fn bench_duplicate_hits(c: &mut Criterion) {
    let suppressor = DuplicateReplySuppressor::new_default();
    suppressor.should_suppress("群規", "Be nice");

    c.bench_function("duplicate_hit", |b| {
        b.iter(|| suppressor.should_suppress(black_box("群規"), black_box("Be nice")))
    });
}

/// Benchmark contention with several threads sharing one suppressor
fn bench_concurrent_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_checks");

    for threads in [2, 4, 8] {
        group.throughput(Throughput::Elements(threads as u64 * 100));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let suppressor = Arc::new(
                    DuplicateReplySuppressor::builder()
                        .with_max_entries(256)
                        .build()
                        .unwrap(),
                );
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let suppressor = Arc::clone(&suppressor);
                        std::thread::spawn(move || {
                            for i in 0..100 {
                                suppressor.should_suppress(&format!("q{t} {i}"), "r");
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_oracles,
    bench_check_window_size,
    bench_duplicate_hits,
    bench_concurrent_checks
);
criterion_main!(benches);
