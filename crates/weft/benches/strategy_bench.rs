//! Exploration Strategy Benchmark Suite
//!
//! Establishes a baseline for the cost of scheduling decisions. Every
//! controlled step of a test pays one `next_operation` call under the kernel
//! mutex, so decision latency directly bounds exploration throughput.
//!
//! # Scenarios
//!
//! 1. **PCT decisions**: cost of a decision as the enabled set grows.
//! 2. **Random decisions**: the uniform baseline for comparison.
//! 3. **Iteration rollover**: PCT change-point reshuffle for long schedules.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weft::{EnabledOperations, OperationId, PctStrategy, RandomStrategy, Strategy};

/// Enabled set with ids `0..count`, created in id order.
fn enabled_ops(count: u64) -> EnabledOperations {
    let mut set = EnabledOperations::new();
    for i in 0..count {
        set.insert(i, OperationId(i));
    }
    set
}

fn bench_pct_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("pct/next_operation");
    for &count in &[2u64, 8, 32, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let enabled = enabled_ops(count);
            let mut strategy = PctStrategy::new(42, 3);
            b.iter(|| {
                black_box(
                    strategy
                        .next_operation(&enabled, OperationId(0))
                        .expect("enabled set is non-empty"),
                )
            });
        });
    }
    group.finish();
}

fn bench_random_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("random/next_operation");
    for &count in &[2u64, 8, 32, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let enabled = enabled_ops(count);
            let mut strategy = RandomStrategy::new(42);
            b.iter(|| {
                black_box(
                    strategy
                        .next_operation(&enabled, OperationId(0))
                        .expect("enabled set is non-empty"),
                )
            });
        });
    }
    group.finish();
}

fn bench_pct_iteration_rollover(c: &mut Criterion) {
    // Observe a long schedule first so the reshuffle has a full step range.
    let mut strategy = PctStrategy::new(42, 10);
    let enabled = enabled_ops(2);
    for _ in 0..1000 {
        strategy
            .next_operation(&enabled, OperationId(0))
            .expect("enabled set is non-empty");
    }

    let mut iteration = 2u64;
    c.bench_function("pct/prepare_next_iteration", |b| {
        b.iter(|| {
            strategy.prepare_next_iteration(iteration);
            iteration += 1;
        })
    });
}

criterion_group!(
    benches,
    bench_pct_decisions,
    bench_random_decisions,
    bench_pct_iteration_rollover
);
criterion_main!(benches);
