use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use epoch_range::EpochRange;

// Benchmark 1: cursor mint/drop and clone/drop churn — the acquire/release
// pair on the shared reference count.
fn bench_cursor_churn(c: &mut Criterion) {
    c.bench_function("cursor_mint_drop", |b| {
        let range = EpochRange::new(vec![0u64; 64]);
        b.iter(|| {
            let cursor = range.begin();
            black_box(&cursor);
        });
    });

    c.bench_function("cursor_clone_drop", |b| {
        let range = EpochRange::new(vec![0u64; 64]);
        let cursor = range.begin();
        b.iter(|| {
            let copy = cursor.clone();
            black_box(&copy);
        });
    });
}

// Benchmark 2: view creation and view-minted cursors.
fn bench_view_churn(c: &mut Criterion) {
    c.bench_function("view_mint_drop", |b| {
        let range = EpochRange::new(vec![0u64; 64]);
        b.iter(|| {
            let view = range.view();
            black_box(&view);
        });
    });

    c.bench_function("view_cursor_mint_drop", |b| {
        let range = EpochRange::new(vec![0u64; 64]);
        let view = range.view();
        b.iter(|| {
            let cursor = view.begin();
            black_box(&cursor);
        });
    });
}

// Benchmark 3: the cost of invalidating — an epoch bump plus the stale
// dereference that notices it.
fn bench_invalidation(c: &mut Criterion) {
    c.bench_function("mutable_access_bump", |b| {
        let mut range = EpochRange::new(vec![0u64; 64]);
        b.iter(|| {
            let contents = range.mutable_access();
            black_box(&contents);
        });
    });

    c.bench_function("stale_dereference", |b| {
        let mut range = EpochRange::new(vec![0u64; 64]);
        let cursor = range.begin();
        let _ = range.mutable_access();
        b.iter(|| black_box(cursor.get().is_err()));
    });
}

criterion_group!(benches, bench_cursor_churn, bench_view_churn, bench_invalidation);
criterion_main!(benches);
