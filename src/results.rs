//! Result types produced by an analysis run.

use crate::{
    bounds::AdjustedBounds,
    config::{AlphaLevel, WindowSpec},
    confidence_intervals::{LagSignificance, NullLagStatistics, PercentileMarks},
    descriptive::{EventSummary, LagStatistics, SeriesSummary},
    monte_carlo::NullDistribution,
    series::Segment,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SegmentStatus {
    /// Statistics were computed
    Ok,
    /// Too few events in range or too few qualifying events
    InsufficientEvents {
        /// Events inside the segment bounds
        in_range: usize,
        /// Events eligible for windowing
        qualifying: usize,
    },
    /// The resolved bounds leave no room for a window
    DegenerateRange {
        /// First year of the empty range
        begin: i32,
        /// Last year of the empty range
        end: i32,
    },
}

impl SegmentStatus {
    /// True when statistics were computed.
    pub fn is_ok(&self) -> bool {
        matches!(self, SegmentStatus::Ok)
    }

    /// True for segments that contribute no numeric rows.
    pub fn is_bad(&self) -> bool {
        !self.is_ok()
    }

    /// One-line description for reports.
    pub fn describe(&self) -> String {
        match self {
            SegmentStatus::Ok => "ok".to_string(),
            SegmentStatus::InsufficientEvents {
                in_range,
                qualifying,
            } => format!(
                "not enough events to run the analysis ({} in range, {} qualifying)",
                in_range, qualifying
            ),
            SegmentStatus::DegenerateRange { begin, end } => {
                format!("empty year range {} to {}", begin, end)
            }
        }
    }
}

/// Everything computed for a segment with enough events.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentAnalysis {
    /// Summary of the series over the tightened bounds
    pub adjusted_series: SeriesSummary,
    /// Key-event figures
    pub events: EventSummary,
    /// Events used in the analysis
    pub qualifying_events: Vec<i32>,
    /// Per-lag statistics of the actual windows
    pub actual: Vec<LagStatistics>,
    /// Per-lag null-model statistics
    pub null: Vec<NullLagStatistics>,
    /// Per-lag significance at the run's alpha level
    pub significance: Vec<LagSignificance>,
    /// Raw simulated means
    pub null_distribution: NullDistribution,
}

impl SegmentAnalysis {
    /// Lags flagged significant against the parametric null interval.
    pub fn significant_lags(&self) -> Vec<i32> {
        self.significance
            .iter()
            .filter(|s| s.significant)
            .map(|s| s.lag)
            .collect()
    }
}

/// Result for one segment, in input order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentResult {
    /// Position in the segment list
    pub index: usize,
    /// Segment as requested
    pub segment: Segment,
    /// Label used in tables
    pub label: String,
    /// Bounds after clamping to the series
    pub initial_bounds: AdjustedBounds,
    /// Bounds after tightening around the qualifying events
    pub bounds: AdjustedBounds,
    /// Outcome
    pub status: SegmentStatus,
    /// Present exactly when `status` is `Ok`
    pub analysis: Option<SegmentAnalysis>,
}

/// Complete output of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochAnalysisResults {
    /// Summary of the whole series
    pub series_summary: SeriesSummary,
    /// Window used for every segment
    pub window: WindowSpec,
    /// Alpha level of the significance flags
    pub alpha_level: AlphaLevel,
    /// Simulations per segment
    pub number_of_simulations: usize,
    /// Run seed
    pub seed: u64,
    /// Percentile ranks shared by every segment
    pub percentile_marks: PercentileMarks,
    /// One result per segment, in input order
    pub segments: Vec<SegmentResult>,
}

impl EpochAnalysisResults {
    /// Segments with computed statistics.
    pub fn ok_segments(&self) -> impl Iterator<Item = &SegmentResult> {
        self.segments.iter().filter(|s| s.status.is_ok())
    }

    /// Segments that were skipped.
    pub fn bad_segments(&self) -> impl Iterator<Item = &SegmentResult> {
        self.segments.iter().filter(|s| s.status.is_bad())
    }
}
