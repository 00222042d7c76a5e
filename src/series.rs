//! # Input Data Model
//!
//! The continuous annual series, the event list and the analysis segments.
//! All three are owned by the caller and only read by the engine.

use crate::errors::{validate_all_finite, EpochAnalysisError, EpochResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Continuous annual time series with strictly consecutive years.
///
/// Stored as a first year plus a dense value vector, so a year lookup is a
/// subtraction and a bounds check.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeries {
    first_year: i32,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series whose first value belongs to `first_year`.
    pub fn new(first_year: i32, values: Vec<f64>) -> EpochResult<Self> {
        if values.is_empty() {
            return Err(EpochAnalysisError::InvalidSeries {
                reason: "time series must contain at least one year".to_string(),
            });
        }
        validate_all_finite(&values, "time series")?;

        if i32::try_from(values.len() - 1)
            .ok()
            .and_then(|span| first_year.checked_add(span))
            .is_none()
        {
            return Err(EpochAnalysisError::InvalidSeries {
                reason: format!(
                    "{} values starting at {} overflow the year range",
                    values.len(),
                    first_year
                ),
            });
        }

        Ok(Self { first_year, values })
    }

    /// Build a series from `(year, value)` pairs.
    ///
    /// Years must be ascending, consecutive and duplicate-free.
    pub fn from_pairs(pairs: &[(i32, f64)]) -> EpochResult<Self> {
        let (first_year, _) = *pairs.first().ok_or_else(|| EpochAnalysisError::InvalidSeries {
            reason: "time series must contain at least one year".to_string(),
        })?;

        for window in pairs.windows(2) {
            let (prev, next) = (window[0].0, window[1].0);
            if prev.checked_add(1) != Some(next) {
                return Err(EpochAnalysisError::InvalidSeries {
                    reason: format!(
                        "years must be consecutive and ascending: {} is followed by {}",
                        prev, next
                    ),
                });
            }
        }

        Self::new(first_year, pairs.iter().map(|&(_, v)| v).collect())
    }

    /// First year of the series.
    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Last year of the series.
    pub fn last_year(&self) -> i32 {
        self.first_year + (self.values.len() as i32 - 1)
    }

    /// Number of years.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in year order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterator over `(year, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (self.first_year + i as i32, v))
    }

    /// Whether the series has a value for `year`.
    pub fn contains_year(&self, year: i32) -> bool {
        year >= self.first_year && year <= self.last_year()
    }

    /// Value at `year`, if the series covers it.
    pub fn value_at(&self, year: i32) -> Option<f64> {
        if self.contains_year(year) {
            Some(self.values[(year - self.first_year) as usize])
        } else {
            None
        }
    }

    /// Values for the inclusive year range `[begin, end]`.
    ///
    /// Returns `None` when the range is empty or not fully covered.
    pub fn slice(&self, begin: i32, end: i32) -> Option<&[f64]> {
        if begin > end || !self.contains_year(begin) || !self.contains_year(end) {
            return None;
        }
        let start = (begin - self.first_year) as usize;
        let stop = (end - self.first_year) as usize;
        Some(&self.values[start..=stop])
    }
}

/// Set of event years, sorted ascending with duplicates collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventList {
    years: Vec<i32>,
}

impl EventList {
    /// Build an event list from years in any order.
    pub fn new<I: IntoIterator<Item = i32>>(years: I) -> Self {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();
        Self { years }
    }

    /// Sorted, unique event years.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Number of distinct events.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// True when there are no events.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

impl FromIterator<i32> for EventList {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Sub-range of years to analyse.
///
/// `(0, 0)` is the "all years" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    /// First year of interest
    pub first_year: i32,
    /// Last year of interest
    pub last_year: i32,
}

impl Segment {
    /// Segment covering `[first_year, last_year]`.
    pub fn new(first_year: i32, last_year: i32) -> Self {
        Self {
            first_year,
            last_year,
        }
    }

    /// The "use the full series range" sentinel.
    pub fn all_years() -> Self {
        Self::new(0, 0)
    }

    /// Whether this is the full-range sentinel.
    pub fn is_all_years(&self) -> bool {
        self.first_year == 0 && self.last_year == 0
    }

    /// Label used in report tables, e.g. `"1700 - 1850"`.
    ///
    /// The sentinel is labelled with the series extent.
    pub fn label(&self, series: &TimeSeries) -> String {
        if self.is_all_years() {
            format!("{} - {}", series.first_year(), series.last_year())
        } else {
            format!("{} - {}", self.first_year, self.last_year)
        }
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::all_years()
    }
}
