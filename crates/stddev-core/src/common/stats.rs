//! Statistics primitives used by the aggregation pipeline.
//!
//! Both functions are total: an empty input yields `0.0` rather than an
//! error, so callers can treat the math as pure computation with no failure
//! mode.

use num_traits::AsPrimitive;

/// Arithmetic mean of `values` in 64-bit floating point.
///
/// Returns `0.0` for an empty slice.
pub fn arithmetic_mean<T>(values: &[T]) -> f64
where
    T: AsPrimitive<f64>,
{
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|value| value.as_()).sum();
    sum / values.len() as f64
}

/// Population standard deviation of `values` in 64-bit floating point.
///
/// The divisor is `n`, not `n - 1`: a single-element slice always yields
/// `0.0`, as does an empty one.
pub fn standard_deviation<T>(values: &[T]) -> f64
where
    T: AsPrimitive<f64>,
{
    if values.is_empty() {
        return 0.0;
    }
    let mean = arithmetic_mean(values);
    let squared: f64 = values
        .iter()
        .map(|value| (value.as_() - mean).powi(2))
        .sum();
    (squared / values.len() as f64).sqrt()
}
