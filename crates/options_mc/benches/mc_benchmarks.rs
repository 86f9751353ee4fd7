//! Criterion benchmarks for options_mc simulation.
//!
//! Benchmarks cover:
//! - RNG performance (single and batched normals)
//! - GBM terminal prices (1K, 10K, 100K paths)
//! - Full path matrices with varying step counts
//! - PnL aggregation and distribution statistics

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use options_mc::distribution::{Histogram, LognormalFit};
use options_mc::paths::{gbm_paths, gbm_terminal_prices, GbmParams};
use options_mc::pnl::{PnlConvention, PnlParams, PnlSeries};
use options_mc::rng::McRng;

fn bench_rng_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rng_generation");

    for n_samples in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("normal_samples", n_samples),
            &n_samples,
            |b, &n| {
                let mut rng = McRng::from_seed(42);
                b.iter(|| {
                    let mut sum = 0.0;
                    for _ in 0..n {
                        sum += rng.gen_normal();
                    }
                    black_box(sum)
                });
            },
        );
    }

    for n_samples in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("normal_batch", n_samples),
            &n_samples,
            |b, &n| {
                let mut rng = McRng::from_seed(42);
                let mut buffer = vec![0.0; n];
                b.iter(|| {
                    rng.fill_normal(&mut buffer);
                    black_box(buffer.iter().sum::<f64>())
                });
            },
        );
    }

    group.finish();
}

/// Terminal-only simulation, the path used by the CLI.
fn bench_terminal_prices(c: &mut Criterion) {
    let mut group = c.benchmark_group("gbm_terminal_prices");
    group.sample_size(20);

    let params = GbmParams::new(100.0, 0.04, 0.25, 0.5);

    for n_paths in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("paths", n_paths), &n_paths, |b, &n| {
            let mut rng = McRng::from_seed(42);
            b.iter(|| gbm_terminal_prices(black_box(&params), n, &mut rng))
        });
    }

    group.finish();
}

fn bench_path_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("gbm_paths");
    group.sample_size(20);

    for steps_per_year in [12, 52, 252] {
        let params = GbmParams::new(100.0, 0.04, 0.25, 1.0).with_steps_per_year(steps_per_year);
        group.bench_with_input(
            BenchmarkId::new("steps_per_year", steps_per_year),
            &params,
            |b, params| {
                let mut rng = McRng::from_seed(42);
                b.iter(|| gbm_paths(black_box(params), 10_000, &mut rng))
            },
        );
    }

    group.finish();
}

fn bench_pnl_and_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("pnl_distribution");

    let params = GbmParams::new(100.0, 0.04, 0.25, 0.5);
    let mut rng = McRng::from_seed(7);
    let terminals = gbm_terminal_prices(&params, 100_000, &mut rng).unwrap();
    let pnl_params = PnlParams::new(100.0, 0.04, 0.5, 7.5, 5.5);

    for convention in [
        PnlConvention::Expiry,
        PnlConvention::PresentValue,
        PnlConvention::OpportunityCost,
    ] {
        group.bench_with_input(
            BenchmarkId::new("pnl_series", convention),
            &convention,
            |b, &convention| {
                b.iter(|| {
                    let series = PnlSeries::from_terminal_prices(
                        black_box(&terminals),
                        &pnl_params,
                        convention,
                    );
                    black_box(series.cumulative_call())
                })
            },
        );
    }

    group.bench_function("histogram_50_bins", |b| {
        b.iter(|| Histogram::density(black_box(&terminals), 50))
    });
    group.bench_function("lognormal_fit", |b| {
        b.iter(|| LognormalFit::fit(black_box(&terminals)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rng_generation,
    bench_terminal_prices,
    bench_path_matrix,
    bench_pnl_and_distribution
);
criterion_main!(benches);
