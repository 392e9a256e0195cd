//! Indicator trait definitions.

/// Smallest accepted smoothing period.
pub const MIN_PERIOD: usize = 2;
/// Largest accepted smoothing period.
pub const MAX_PERIOD: usize = 100;

/// Clamp a user-supplied period to `[MIN_PERIOD, MAX_PERIOD]`.
#[inline]
pub fn clamp_period(period: usize) -> usize {
    period.clamp(MIN_PERIOD, MAX_PERIOD)
}

/// Trait for series indicators.
///
/// Indicators map a rate series to a series of the same length. Positions
/// where no value can be derived are `None` rather than zero or `NaN`.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given series.
    ///
    /// # Arguments
    /// * `data` - Input rates; non-finite or non-positive entries are treated as absent
    ///
    /// # Returns
    /// One output per input position
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;

    /// Get the effective (clamped) period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
