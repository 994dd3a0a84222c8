//! Performance benchmarks for the omnibox engine.
//!
//! Run with: cargo bench
//!
//! Target performance:
//! - Index query: < 20ms on a realistic corpus
//! - Full synchronous fan-out: < 50ms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use omnibox::stores::{HistoryEntry, VisitKind};
use omnibox::{classifier, scoring, tokenizer, UrlIndex};

fn corpus(size: usize) -> Vec<HistoryEntry> {
    let hosts = ["github.com", "docs.rs", "crates.io", "news.ycombinator.com", "example.com"];
    (0..size)
        .map(|i| HistoryEntry {
            url: format!("https://{}/page/{i}/section-{}", hosts[i % hosts.len()], i % 37),
            title: format!("Page {i} about topic {}", i % 53),
            visit_count: (i % 40) as i64 + 1,
            typed_count: (i % 7) as i64,
            last_visit_ms: 1_700_000_000_000 - (i as i64 * 3_600_000),
            last_visit_kind: VisitKind::Typed,
        })
        .collect()
}

/// Benchmark tokenization of typical URLs and titles.
fn bench_tokenizer(c: &mut Criterion) {
    let inputs = [
        ("url", "https://github.com/rust-lang/cargo/issues/1234"),
        ("title", "Borrow checker - The Rust Programming Language"),
        ("query", "rust async cancellation pattern"),
    ];

    let mut group = c.benchmark_group("tokenizer");
    for (name, text) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| black_box(tokenizer::tokenize(black_box(text))))
        });
    }
    group.finish();
}

/// Benchmark input classification.
fn bench_classifier(c: &mut Criterion) {
    let inputs = [
        "https://example.com",
        "localhost:8080/admin",
        "192.168.1.1",
        "github.com",
        "rust borrow checker",
        "?forced query",
    ];

    c.bench_function("classifier", |b| {
        b.iter(|| {
            for input in inputs {
                black_box(classifier::classify(black_box(input)));
            }
        })
    });
}

/// Benchmark index queries across corpus sizes.
fn bench_index_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_query");

    for size in [1_000, 10_000] {
        let index = UrlIndex::new();
        index.rebuild(&corpus(size), 1_700_000_000_000);

        let terms: Vec<String> = vec!["github".into(), "page".into()];
        group.bench_with_input(BenchmarkId::from_parameter(size), &terms, |b, terms| {
            b.iter(|| black_box(index.query(black_box(terms))))
        });
    }

    group.finish();
}

/// Benchmark a full index rebuild.
fn bench_index_rebuild(c: &mut Criterion) {
    let entries = corpus(10_000);

    c.bench_function("index_rebuild_10k", |b| {
        b.iter(|| {
            let index = UrlIndex::new();
            index.rebuild(black_box(&entries), 1_700_000_000_000);
            black_box(index.len())
        })
    });
}

/// Benchmark the scoring hot path.
fn bench_scoring(c: &mut Criterion) {
    const NOW: i64 = 1_700_000_000_000;

    c.bench_function("frecency", |b| {
        b.iter(|| {
            black_box(scoring::frecency(
                black_box(25),
                black_box(6),
                black_box(NOW - 86_400_000),
                VisitKind::Typed,
                NOW,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_tokenizer,
    bench_classifier,
    bench_index_query,
    bench_index_rebuild,
    bench_scoring,
);

criterion_main!(benches);
