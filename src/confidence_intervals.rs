//! Confidence intervals and significance of the lag means.
//!
//! The null distribution of every lag is summarised twice: with a
//! parametric interval `mean ± multiplier * std` and with an empirical
//! percentile interval read from the sorted simulated means. A lag is
//! significant when its actual mean falls strictly outside the null interval
//! at the chosen alpha level.

use crate::{
    config::AlphaLevel,
    descriptive::LagStatistics,
    math_utils::{float_total_cmp, max_value, mean, min_value, sample_variance},
    monte_carlo::NullDistribution,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Methods for constructing confidence intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConfidenceIntervalMethod {
    /// Normal approximation with the fixed multiplier
    Parametric,
    /// Order statistics of the simulated means
    Percentile,
}

/// Confidence interval.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfidenceInterval {
    /// Confidence level
    pub level: AlphaLevel,
    /// Lower bound
    pub lower_bound: f64,
    /// Upper bound
    pub upper_bound: f64,
    /// Method used for CI construction
    pub method: ConfidenceIntervalMethod,
}

impl ConfidenceInterval {
    /// `mean ± multiplier(level) * std_dev`.
    pub fn parametric(level: AlphaLevel, mean: f64, std_dev: f64) -> Self {
        let half_width = level.multiplier() * std_dev;
        Self {
            level,
            lower_bound: mean - half_width,
            upper_bound: mean + half_width,
            method: ConfidenceIntervalMethod::Parametric,
        }
    }

    /// Interval between two entries of `sorted`.
    pub fn percentile(level: AlphaLevel, sorted: &[f64], marks: &PercentileMarks) -> Self {
        let (low, high) = marks.ranks(level);
        Self {
            level,
            lower_bound: sorted.get(low).copied().unwrap_or(f64::NAN),
            upper_bound: sorted.get(high).copied().unwrap_or(f64::NAN),
            method: ConfidenceIntervalMethod::Percentile,
        }
    }

    /// True when `value` lies strictly below or above the interval.
    ///
    /// NaN values and NaN bounds are never outside.
    pub fn excludes(&self, value: f64) -> bool {
        value < self.lower_bound || value > self.upper_bound
    }

    /// Whether `value` lies within the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }

    /// `upper_bound - lower_bound`.
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// One interval per alpha level, indexed by [`AlphaLevel::index`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelIntervals {
    intervals: Vec<ConfidenceInterval>,
}

impl LevelIntervals {
    /// Parametric intervals around `mean` at every level.
    pub fn parametric(mean: f64, std_dev: f64) -> Self {
        Self {
            intervals: AlphaLevel::ALL
                .iter()
                .map(|&level| ConfidenceInterval::parametric(level, mean, std_dev))
                .collect(),
        }
    }

    /// Percentile intervals from `sorted` at every level.
    pub fn percentile(sorted: &[f64], marks: &PercentileMarks) -> Self {
        Self {
            intervals: AlphaLevel::ALL
                .iter()
                .map(|&level| ConfidenceInterval::percentile(level, sorted, marks))
                .collect(),
        }
    }

    /// Interval at `level`.
    pub fn at(&self, level: AlphaLevel) -> &ConfidenceInterval {
        &self.intervals[level.index()]
    }

    /// All intervals in [`AlphaLevel::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfidenceInterval> {
        self.intervals.iter()
    }
}

/// Ranks into the sorted null distribution for each percentile interval.
///
/// With `N` simulations and tail divisor `d`, the lower rank is
/// `max(round(N / d), 1) - 1` and the upper rank mirrors it from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PercentileMarks {
    simulations: usize,
    ranks: [(usize, usize); 3],
}

impl PercentileMarks {
    /// Marks for a run of `simulations` (at least 1) simulations.
    pub fn new(simulations: usize) -> Self {
        let simulations = simulations.max(1);
        let mut ranks = [(0, 0); 3];
        for level in AlphaLevel::ALL {
            let tail = ((simulations as f64 / level.tail_divisor()).round() as usize).max(1);
            let low = (tail - 1).min(simulations - 1);
            let high = (simulations - low - 1).max(low);
            ranks[level.index()] = (low, high);
        }
        Self { simulations, ranks }
    }

    /// Number of simulations the marks were built for.
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// `(low, high)` ranks at `level`.
    pub fn ranks(&self, level: AlphaLevel) -> (usize, usize) {
        self.ranks[level.index()]
    }
}

/// Null-model statistics at one lag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NullLagStatistics {
    /// Lag relative to the event year
    pub lag: i32,
    /// Mean of the simulated means
    pub mean: f64,
    /// Sample variance of the simulated means
    pub variance: f64,
    /// Square root of `variance`
    pub std_dev: f64,
    /// Smallest simulated mean
    pub min: f64,
    /// Largest simulated mean
    pub max: f64,
    /// Parametric intervals
    pub parametric: LevelIntervals,
    /// Percentile intervals
    pub percentile: LevelIntervals,
}

impl NullLagStatistics {
    /// Summarise the simulated means of one lag.
    pub fn from_means(lag: i32, means: &[f64], marks: &PercentileMarks) -> Self {
        let mean = mean(means);
        let variance = sample_variance(means);
        let std_dev = variance.sqrt();

        let mut sorted = means.to_vec();
        sorted.sort_by(float_total_cmp);

        Self {
            lag,
            mean,
            variance,
            std_dev,
            min: min_value(means),
            max: max_value(means),
            parametric: LevelIntervals::parametric(mean, std_dev),
            percentile: LevelIntervals::percentile(&sorted, marks),
        }
    }
}

/// Null statistics for every lag of `null`.
pub fn null_lag_statistics(null: &NullDistribution, marks: &PercentileMarks) -> Vec<NullLagStatistics> {
    null.iter()
        .map(|(lag, means)| NullLagStatistics::from_means(lag, means, marks))
        .collect()
}

/// Significance of one lag's actual mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LagSignificance {
    /// Lag relative to the event year
    pub lag: i32,
    /// Outside the parametric null interval
    pub significant: bool,
    /// Outside the percentile null interval
    pub significant_percentile: bool,
}

/// Flag each lag whose actual mean lies outside the null intervals at `level`.
pub fn evaluate_significance(
    actual: &[LagStatistics],
    null: &[NullLagStatistics],
    level: AlphaLevel,
) -> Vec<LagSignificance> {
    actual
        .iter()
        .zip(null)
        .map(|(actual, null)| LagSignificance {
            lag: actual.lag,
            significant: null.parametric.at(level).excludes(actual.mean),
            significant_percentile: null.percentile.at(level).excludes(actual.mean),
        })
        .collect()
}
