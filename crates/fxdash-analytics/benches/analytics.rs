//! Benchmarks for analytics kernels.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fxdash_analytics::{volatility, ExponentialMovingAverage, MovingAverage, SeriesMetrics};
use fxdash_core::traits::Indicator;

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            // Sprinkle gaps the way missing publication days show up
            if i % 17 == 0 {
                f64::NAN
            } else {
                1.1 + (i as f64 * 0.1).sin() * 0.05
            }
        })
        .collect()
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");

    for size in [365, 3650, 36500].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("ma", size), &data, |b, data| {
            let ma = MovingAverage::new(20);
            b.iter(|| ma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            let ema = ExponentialMovingAverage::new(20);
            b.iter(|| ema.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for size in [30, 365, 3650].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("volatility", size), &data, |b, data| {
            b.iter(|| volatility(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("series_metrics", size), &data, |b, data| {
            b.iter(|| SeriesMetrics::from_series(black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_moving_averages, benchmark_statistics);
criterion_main!(benches);
