//! Mathematical utility functions for epoch analysis.
//!
//! Descriptive statistics over plain `f64` slices. Conventions follow the
//! dendrochronology tooling these numbers are compared against: sample
//! (n-1) variance for series summaries, bias-corrected skewness and excess
//! kurtosis, and the Fritts mean sensitivity.

use statrs::statistics::Statistics;

/// Variance below which skewness and kurtosis are reported as zero.
const MOMENT_VARIANCE_FLOOR: f64 = 1e-19;

/// Safe comparison for floating point values (handles NaN)
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater, // push NaN to end
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
    }
}

/// Arithmetic mean; NaN for empty input.
pub fn mean(data: &[f64]) -> f64 {
    data.iter().mean()
}

/// Sample variance with the n-1 denominator.
///
/// Zero for a single value, NaN for empty input.
pub fn sample_variance(data: &[f64]) -> f64 {
    match data.len() {
        0 => f64::NAN,
        1 => 0.0,
        _ => data.iter().variance().max(0.0),
    }
}

/// Population variance with the n denominator; NaN for empty input.
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().population_variance().max(0.0)
}

/// Smallest value; NaN for empty input.
pub fn min_value(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .min_by(float_total_cmp)
        .unwrap_or(f64::NAN)
}

/// Largest value; NaN for empty input.
pub fn max_value(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .max_by(float_total_cmp)
        .unwrap_or(f64::NAN)
}

/// Calculate median of already-sorted data (handles even-length correctly)
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Calculate median (handles even-length correctly)
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut v = values.to_vec();
    v.sort_by(float_total_cmp);
    median_of_sorted(&v)
}

/// Bias-corrected sample skewness.
///
/// `n / ((n-1)(n-2)) * Σ((x - mean) / s)^3` with `s` the sample standard
/// deviation. NaN below three values, zero for (near) constant data.
pub fn skewness(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 3 {
        return f64::NAN;
    }
    let m = mean(data);
    let variance = sample_variance(data);
    if variance < MOMENT_VARIANCE_FLOOR {
        return 0.0;
    }

    let third: f64 = data.iter().map(|x| (x - m).powi(3)).sum::<f64>();
    let n = n as f64;
    n / ((n - 1.0) * (n - 2.0)) * third / (variance * variance.sqrt())
}

/// Bias-corrected sample excess kurtosis.
///
/// NaN below four values, zero for (near) constant data.
pub fn excess_kurtosis(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 4 {
        return f64::NAN;
    }
    let m = mean(data);
    let variance = sample_variance(data);
    if variance < MOMENT_VARIANCE_FLOOR {
        return 0.0;
    }

    let fourth: f64 = data.iter().map(|x| (x - m).powi(4)).sum::<f64>() / (variance * variance);
    let n = n as f64;
    let coefficient = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
    let correction = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    coefficient * fourth - correction
}

/// Mean sensitivity of a ring-width style series.
///
/// Sums `|2 (x_i - x_{i-1})| / (|x_i| + |x_{i-1}|)` over consecutive pairs,
/// skipping pairs whose denominator is zero, and divides by the number of
/// pairs (`n - 1`). NaN below two values.
pub fn mean_sensitivity(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }

    let total: f64 = data
        .windows(2)
        .filter_map(|pair| {
            let denominator = pair[1].abs() + pair[0].abs();
            if denominator != 0.0 {
                Some((2.0 * (pair[1] - pair[0])).abs() / denominator)
            } else {
                None
            }
        })
        .sum();

    total / (data.len() - 1) as f64
}

/// First-order autocorrelation index.
///
/// `Σ(x_i - mean)(x_{i+1} - mean) / Σ(x_i - mean)^2`; zero when the series
/// is constant.
pub fn lag1_autocorrelation(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);

    let numerator: f64 = data.windows(2).map(|w| (w[0] - m) * (w[1] - m)).sum();
    let denominator: f64 = data.iter().map(|x| (x - m) * (x - m)).sum();

    float_ops::safe_div(numerator, denominator).unwrap_or(0.0)
}

/// Floating point helpers.
pub mod float_ops {
    /// Default epsilon for floating point comparisons
    pub const DEFAULT_EPSILON: f64 = 1e-12;

    /// Check if a floating point number is approximately zero
    #[inline]
    pub fn approx_zero(x: f64) -> bool {
        x.abs() < DEFAULT_EPSILON
    }

    /// Safe division that checks for near-zero denominators and infinite/NaN inputs
    pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
        if approx_zero(denominator) || !numerator.is_finite() || !denominator.is_finite() {
            None
        } else {
            Some(numerator / denominator)
        }
    }
}
