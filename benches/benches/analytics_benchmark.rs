//! Chart normalization and statistics benchmarks.
//!
//! Run with: `cargo bench --package polydash-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use polydash_bench::synthetic_results;
use polydash_lib::{ChartMode, chart_from_results, compute_stats};
use std::hint::black_box;

/// (tickers, days) combinations to benchmark.
const SIZES: &[(usize, usize)] = &[(1, 90), (7, 90), (7, 365), (50, 365)];

fn chart_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");

    for &(tickers, days) in SIZES {
        let results = synthetic_results(tickers, days);
        group.throughput(Throughput::Elements((tickers * days) as u64));

        for mode in [ChartMode::Raw, ChartMode::Indexed] {
            group.bench_with_input(
                BenchmarkId::new(mode.as_str(), format!("{tickers}x{days}")),
                &results,
                |b, results| b.iter(|| chart_from_results(black_box(results), mode)),
            );
        }
    }

    group.finish();
}

fn stats_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for tickers in [7, 50, 500] {
        let results = synthetic_results(tickers, 2);
        group.throughput(Throughput::Elements(tickers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tickers), &results, |b, results| {
            b.iter(|| compute_stats(black_box(results).iter().map(|r| &r.summary)))
        });
    }

    group.finish();
}

criterion_group!(benches, chart_benchmark, stats_benchmark);
criterion_main!(benches);
