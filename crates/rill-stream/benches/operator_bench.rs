//! Benchmarks for source construction and operator chains.
//!
//! Run with: cargo bench -p rill-stream --bench operator_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rill_stream::{Subject, combine, from_array};
use std::hint::black_box;

// =============================================================================
// Synchronous sources
// =============================================================================

fn bench_from_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("source/from_array");

    for len in [16usize, 256, 4096] {
        let values: Vec<u64> = (0..len as u64).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &values, |b, values| {
            b.iter(|| {
                let source = from_array(values.clone());
                let sub = source.for_each(|v| {
                    black_box(v);
                });
                drop(sub);
            })
        });
    }

    group.finish();
}

// =============================================================================
// Operator chains
// =============================================================================

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators/chain");
    let values: Vec<u64> = (0..1024).collect();

    group.bench_function("map_filter_scan", |b| {
        b.iter(|| {
            let source = from_array(values.clone())
                .map(|x| x * 3)
                .filter(|x| x % 2 == 0)
                .scan(0u64, |acc, x| acc + x);
            let sub = source.for_each(|v| {
                black_box(v);
            });
            drop(sub);
        })
    });

    group.finish();
}

// =============================================================================
// Hot fan-out
// =============================================================================

fn bench_subject_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("subject/fanout");

    for subscribers in [1usize, 8, 64] {
        let subject = Subject::new();
        let subs: Vec<_> = (0..subscribers)
            .map(|_| {
                subject.source().for_each(|v: u64| {
                    black_box(v);
                })
            })
            .collect();
        group.bench_function(BenchmarkId::from_parameter(subscribers), |b| {
            b.iter(|| subject.next(black_box(7)))
        });
        drop(subs);
    }

    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators/combine");
    let a = Subject::new();
    let b = Subject::new();
    let sub = combine(vec![a.source(), b.source()]).for_each(|v: Vec<u32>| {
        black_box(v);
    });
    a.next(0);
    b.next(0);

    group.bench_function("two_inputs", |bench| {
        bench.iter(|| {
            a.next(black_box(1));
            b.next(black_box(2));
        })
    });

    group.finish();
    drop(sub);
}

criterion_group!(
    benches,
    bench_from_array,
    bench_chain,
    bench_subject_fanout,
    bench_combine
);
criterion_main!(benches);
