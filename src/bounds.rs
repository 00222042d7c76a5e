//! Year range resolution for analysis segments.

use crate::series::{Segment, TimeSeries};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive `(begin_year, end_year)` range actually analysed for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdjustedBounds {
    /// First analysed year
    pub begin_year: i32,
    /// Last analysed year
    pub end_year: i32,
}

impl AdjustedBounds {
    /// Bounds covering `[begin_year, end_year]`.
    pub fn new(begin_year: i32, end_year: i32) -> Self {
        Self {
            begin_year,
            end_year,
        }
    }

    /// True when the range holds no years.
    pub fn is_degenerate(&self) -> bool {
        self.end_year < self.begin_year
    }

    /// Whether `year` lies inside the range.
    pub fn contains(&self, year: i32) -> bool {
        year >= self.begin_year && year <= self.end_year
    }

    /// Number of years in the range; zero when degenerate.
    pub fn len(&self) -> usize {
        if self.is_degenerate() {
            0
        } else {
            (self.end_year - self.begin_year) as usize + 1
        }
    }

    /// True when the range holds no years.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every year of `self` is inside `other`.
    pub fn is_subset_of(&self, other: &AdjustedBounds) -> bool {
        self.is_degenerate()
            || (self.begin_year >= other.begin_year && self.end_year <= other.end_year)
    }
}

/// Clamp a segment to the series extent.
///
/// The `(0, 0)` sentinel resolves to the full series.
pub fn resolve_initial_bounds(series: &TimeSeries, segment: &Segment) -> AdjustedBounds {
    let (first, last) = (series.first_year(), series.last_year());
    if segment.is_all_years() {
        AdjustedBounds::new(first, last)
    } else {
        AdjustedBounds::new(segment.first_year.max(first), segment.last_year.min(last))
    }
}
