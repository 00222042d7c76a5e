//! Descriptive statistics of the actual data.
//!
//! Per-lag statistics over the extracted epoch windows, plus the summary
//! blocks printed in the narrative report: the (adjusted) continuous series
//! and the key events of a segment.

use crate::{
    config::AlphaLevel,
    confidence_intervals::{ConfidenceInterval, LevelIntervals},
    math_utils::{
        excess_kurtosis, lag1_autocorrelation, max_value, mean, mean_sensitivity, median,
        min_value, population_variance, sample_variance, skewness,
    },
    window::EpochWindows,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Statistics of the actual event windows at one lag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LagStatistics {
    /// Lag relative to the event year
    pub lag: i32,
    /// Number of events contributing at this lag
    pub count: usize,
    /// Mean of the contributing values
    pub mean: f64,
    /// Population variance of the contributing values
    pub variance: f64,
    /// Square root of `variance`
    pub std_dev: f64,
    /// Smallest contributing value
    pub min: f64,
    /// Largest contributing value
    pub max: f64,
    /// `mean ± multiplier * std_dev` at every alpha level
    pub intervals: LevelIntervals,
}

impl LagStatistics {
    /// Statistics over `values` at `lag`.
    ///
    /// Empty input yields a zero count and NaN statistics.
    pub fn from_values(lag: i32, values: &[f64]) -> Self {
        let mean = mean(values);
        let variance = population_variance(values);
        let std_dev = variance.sqrt();
        Self {
            lag,
            count: values.len(),
            mean,
            variance,
            std_dev,
            min: min_value(values),
            max: max_value(values),
            intervals: LevelIntervals::parametric(mean, std_dev),
        }
    }

    /// Parametric interval at `level`.
    pub fn interval(&self, level: AlphaLevel) -> &ConfidenceInterval {
        self.intervals.at(level)
    }
}

/// Per-lag statistics of the actual event windows, in lag order.
pub fn lag_statistics(windows: &EpochWindows) -> Vec<LagStatistics> {
    windows
        .lags
        .iter()
        .zip(&windows.values)
        .map(|(&lag, values)| LagStatistics::from_values(lag, values))
        .collect()
}

/// Descriptive summary of a run of consecutive series values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeriesSummary {
    /// First year summarised
    pub first_year: i32,
    /// Last year summarised
    pub last_year: i32,
    /// Number of years
    pub years: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Median
    pub median: f64,
    /// Bias-corrected skewness
    pub skewness: f64,
    /// Bias-corrected excess kurtosis
    pub kurtosis: f64,
    /// Mean sensitivity
    pub mean_sensitivity: f64,
    /// First-order autocorrelation index
    pub autocorrelation: f64,
}

impl SeriesSummary {
    /// Summarise `values`, the series from `first_year` onwards.
    pub fn from_values(first_year: i32, values: &[f64]) -> Self {
        Self {
            first_year,
            last_year: first_year + values.len() as i32 - 1,
            years: values.len(),
            mean: mean(values),
            std_dev: sample_variance(values).sqrt(),
            median: median(values),
            skewness: skewness(values),
            kurtosis: excess_kurtosis(values),
            mean_sensitivity: mean_sensitivity(values),
            autocorrelation: lag1_autocorrelation(values),
        }
    }
}

/// Key-event figures for one segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventSummary {
    /// Events in the whole event list
    pub total_events: usize,
    /// Events inside the segment with a series value
    pub in_range: usize,
    /// Events used in the analysis
    pub used: usize,
    /// Mean gap between consecutive in-range events
    pub mean_years_between: f64,
    /// Smallest gap between consecutive in-range events
    pub min_difference: Option<i32>,
}

impl EventSummary {
    /// Summary for `in_range` (ascending) of which `used` took part.
    pub fn new(total_events: usize, in_range: &[i32], used: usize) -> Self {
        let gaps: Vec<i32> = in_range.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let mean_years_between = if gaps.is_empty() {
            f64::NAN
        } else {
            gaps.iter().sum::<i32>() as f64 / gaps.len() as f64
        };

        Self {
            total_events,
            in_range: in_range.len(),
            used,
            mean_years_between,
            min_difference: gaps.iter().copied().min(),
        }
    }
}
