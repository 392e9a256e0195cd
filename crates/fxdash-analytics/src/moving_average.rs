//! Moving average indicators.

use fxdash_core::traits::{clamp_period, Indicator};
use fxdash_core::types::is_valid_rate;

/// Simple Moving Average (MA).
///
/// Averages the valid values in a trailing window. Invalid entries are
/// skipped and the divisor is the number of valid values actually present.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    period: usize,
}

impl MovingAverage {
    /// Create a new MA. The period is clamped to `[2, 100]`.
    pub fn new(period: usize) -> Self {
        Self {
            period: clamp_period(period),
        }
    }
}

impl Indicator for MovingAverage {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        // Each window is summed afresh.
        (0..data.len())
            .map(|i| {
                if i + 1 < self.period {
                    return None;
                }
                let (sum, count) = data[i + 1 - self.period..=i]
                    .iter()
                    .filter(|v| is_valid_rate(**v))
                    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
                (count > 0).then(|| sum / count as f64)
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "MA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the simple average of the first `period` valid points.
/// Invalid inputs produce `None` and do not advance the recursion.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    period: usize,
    multiplier: f64,
}

impl ExponentialMovingAverage {
    /// Create a new EMA. The period is clamped to `[2, 100]`.
    pub fn new(period: usize) -> Self {
        let period = clamp_period(period);
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    /// Smoothing factor `2 / (period + 1)`.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for ExponentialMovingAverage {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(data.len());

        // Short series seed from whatever valid points exist.
        let valid_total = data.iter().filter(|v| is_valid_rate(**v)).count();
        let seed_len = valid_total.min(self.period);

        let mut ema: Option<f64> = None;
        let mut seed_sum = 0.0;
        let mut seen = 0usize;

        for &value in data {
            if !is_valid_rate(value) {
                result.push(None);
                continue;
            }

            match ema {
                Some(prev) => {
                    let next = (value - prev) * self.multiplier + prev;
                    ema = Some(next);
                    result.push(ema);
                }
                None => {
                    seen += 1;
                    seed_sum += value;
                    if seen == seed_len {
                        ema = Some(seed_sum / seen as f64);
                        result.push(ema);
                    } else {
                        result.push(None);
                    }
                }
            }
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_series(actual: &[Option<f64>], expected: &[Option<f64>]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            match (a, e) {
                (Some(a), Some(e)) => assert!((a - e).abs() < 1e-10, "{:?} vs {:?}", actual, expected),
                (None, None) => {}
                _ => panic!("{:?} vs {:?}", actual, expected),
            }
        }
    }

    #[test]
    fn test_ma() {
        let ma = MovingAverage::new(3);
        let result = ma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_series(&result, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_ma_divides_by_valid_count() {
        let ma = MovingAverage::new(3);
        let result = ma.calculate(&[1.0, f64::NAN, 3.0, -2.0, 5.0]);

        // (1+3)/2, (3)/1, (3+5)/2
        assert_series(&result, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_ma_window_without_valid_values() {
        let ma = MovingAverage::new(2);
        let result = ma.calculate(&[1.0, f64::NAN, 0.0, 4.0]);

        assert_series(&result, &[None, Some(1.0), None, Some(4.0)]);
    }

    #[test]
    fn test_ma_mixed_magnitudes() {
        let ma = MovingAverage::new(2);
        let result = ma.calculate(&[1e16, 1.0, 1.0, 1.0]);

        assert_series(&result, &[None, Some(5e15), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_ma_period_clamped() {
        assert_eq!(MovingAverage::new(1).period(), 2);
        assert_eq!(MovingAverage::new(1000).period(), 100);
        assert!(MovingAverage::new(5).calculate(&[]).is_empty());
    }

    #[test]
    fn test_ema() {
        let ema = ExponentialMovingAverage::new(3);
        let result = ema.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        // mult = 2/(3+1) = 0.5; seed = SMA(1,2,3) = 2
        assert!((ema.multiplier() - 0.5).abs() < 1e-12);
        assert_series(&result, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_ema_gap_keeps_state() {
        let ema = ExponentialMovingAverage::new(3);
        let result = ema.calculate(&[1.0, 2.0, 3.0, f64::NAN, 5.0]);

        // Resumes from 2.0: (5 - 2) * 0.5 + 2 = 3.5
        assert_series(&result, &[None, None, Some(2.0), None, Some(3.5)]);
    }

    #[test]
    fn test_ema_seed_skips_invalid_points() {
        let ema = ExponentialMovingAverage::new(2);
        let result = ema.calculate(&[f64::NAN, 2.0, -1.0, 4.0, 6.0]);

        // Seed = (2+4)/2 at index 3, mult = 2/3
        let next = (6.0 - 3.0) * (2.0 / 3.0) + 3.0;
        assert_series(&result, &[None, None, None, Some(3.0), Some(next)]);
    }

    #[test]
    fn test_ema_short_series_seeds_from_available_points() {
        let ema = ExponentialMovingAverage::new(10);
        let result = ema.calculate(&[2.0, 4.0]);

        assert_series(&result, &[None, Some(3.0)]);
    }

    #[test]
    fn test_ema_no_valid_points() {
        let ema = ExponentialMovingAverage::new(3);
        let result = ema.calculate(&[f64::NAN, 0.0]);

        assert_series(&result, &[None, None]);
    }
}
