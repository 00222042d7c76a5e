//! # Superposed Epoch Analyzer
//!
//! [`SuperposedEpochAnalyzer`] is the entry point of the crate. It owns the
//! inputs of a run, validates the configuration up front and then processes
//! each segment in order:
//!
//! 1. resolve the segment's year range against the series;
//! 2. filter the events and tighten the range around them;
//! 3. extract the epoch windows and their statistics;
//! 4. simulate the null distribution and evaluate significance.
//!
//! Segments without enough events are recorded with a non-`Ok`
//! [`SegmentStatus`] and the run moves on.
//!
//! ## Usage Example
//!
//! ```rust
//! use superposed_epoch::{
//!     assemble_report, EventList, RunConfig, SuperposedEpochAnalyzer, TimeSeries, WindowSpec,
//! };
//! use superposed_epoch::errors::EpochAnalysisError;
//!
//! # fn main() -> Result<(), EpochAnalysisError> {
//! let values: Vec<f64> = (0..60).map(|i| ((i * 7) % 5) as f64).collect();
//! let series = TimeSeries::new(1900, values)?;
//! let events = EventList::new(vec![1910, 1925, 1940]);
//! let config = RunConfig::quick();
//!
//! let analyzer = SuperposedEpochAnalyzer::new(series, events, WindowSpec::new(3, 2)?, config.clone())?;
//! let results = analyzer.run()?;
//! let report = assemble_report(&results, &config);
//! println!("{}", report.actual_table_text());
//! # Ok(())
//! # }
//! ```

use crate::{
    bounds::{resolve_initial_bounds, AdjustedBounds},
    config::{RunConfig, WindowSpec},
    confidence_intervals::{evaluate_significance, null_lag_statistics, PercentileMarks},
    descriptive::{lag_statistics, EventSummary, SeriesSummary},
    errors::{EpochAnalysisError, EpochResult},
    event_filter::{filter_events, FilterOutcome},
    monte_carlo::simulate_null_distribution,
    results::{EpochAnalysisResults, SegmentAnalysis, SegmentResult, SegmentStatus},
    series::{EventList, Segment, TimeSeries},
    window::extract_windows,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Runs superposed epoch analysis over one series and one event list.
#[derive(Debug, Clone)]
pub struct SuperposedEpochAnalyzer {
    series: TimeSeries,
    events: EventList,
    window: WindowSpec,
    config: RunConfig,
    segments: Vec<Segment>,
}

impl SuperposedEpochAnalyzer {
    /// Create an analyzer over the full series range.
    ///
    /// Fails fast on an invalid configuration.
    pub fn new(
        series: TimeSeries,
        events: EventList,
        window: WindowSpec,
        config: RunConfig,
    ) -> EpochResult<Self> {
        config.validate()?;
        Ok(Self {
            series,
            events,
            window,
            config,
            segments: vec![Segment::all_years()],
        })
    }

    /// Replace the segment list. An empty list means the full range.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = if segments.is_empty() {
            vec![Segment::all_years()]
        } else {
            segments
        };
        self
    }

    /// The series being analysed.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// The event list.
    pub fn events(&self) -> &EventList {
        &self.events
    }

    /// The epoch window.
    pub fn window(&self) -> &WindowSpec {
        &self.window
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Segments in processing order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Analyse every segment.
    pub fn run(&self) -> EpochResult<EpochAnalysisResults> {
        self.run_with_cancellation(&AtomicBool::new(false))
    }

    /// Analyse every segment, checking `cancel` before each one starts.
    pub fn run_with_cancellation(&self, cancel: &AtomicBool) -> EpochResult<EpochAnalysisResults> {
        self.config.validate()?;

        log::debug!(
            "superposed epoch analysis: years {}-{}, {} events, window -{}..+{}, {} simulations, seed {}",
            self.series.first_year(),
            self.series.last_year(),
            self.events.len(),
            self.window.prior_years(),
            self.window.after_years(),
            self.config.number_of_simulations,
            self.config.seed
        );

        let marks = PercentileMarks::new(self.config.number_of_simulations);
        let mut segments = Vec::with_capacity(self.segments.len());

        for (index, segment) in self.segments.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                log::info!("analysis cancelled before segment {}", index);
                return Err(EpochAnalysisError::Cancelled {
                    segment_index: index,
                });
            }
            segments.push(self.analyze_segment(index, segment, &marks)?);
        }

        Ok(EpochAnalysisResults {
            series_summary: SeriesSummary::from_values(
                self.series.first_year(),
                self.series.values(),
            ),
            window: self.window,
            alpha_level: self.config.alpha_level,
            number_of_simulations: self.config.number_of_simulations,
            seed: self.config.seed,
            percentile_marks: marks,
            segments,
        })
    }

    /// Analyse a single segment.
    pub fn analyze_segment(
        &self,
        index: usize,
        segment: &Segment,
        marks: &PercentileMarks,
    ) -> EpochResult<SegmentResult> {
        let label = segment.label(&self.series);
        let initial_bounds = resolve_initial_bounds(&self.series, segment);

        let skipped = |status: SegmentStatus, bounds: AdjustedBounds| {
            log::warn!("segment {} ({}) skipped: {}", index + 1, label, status.describe());
            SegmentResult {
                index,
                segment: *segment,
                label: label.clone(),
                initial_bounds,
                bounds,
                status,
                analysis: None,
            }
        };

        let filtered = match filter_events(
            &self.series,
            &self.events,
            initial_bounds,
            &self.window,
            self.config.include_incomplete_epochs,
        ) {
            FilterOutcome::Usable(filtered) => filtered,
            FilterOutcome::InsufficientEvents {
                in_range,
                qualifying,
                bounds,
            } => {
                return Ok(skipped(
                    SegmentStatus::InsufficientEvents {
                        in_range,
                        qualifying,
                    },
                    bounds,
                ))
            }
            FilterOutcome::DegenerateRange { bounds } => {
                return Ok(skipped(
                    SegmentStatus::DegenerateRange {
                        begin: bounds.begin_year,
                        end: bounds.end_year,
                    },
                    bounds,
                ))
            }
        };

        let bounds = filtered.bounds;
        log::debug!(
            "segment {} ({}): bounds {}-{} tightened to {}-{}",
            index + 1,
            label,
            initial_bounds.begin_year,
            initial_bounds.end_year,
            bounds.begin_year,
            bounds.end_year
        );

        let adjusted_values = self
            .series
            .slice(bounds.begin_year, bounds.end_year)
            .ok_or(EpochAnalysisError::WindowOutOfSeries {
                year: bounds.begin_year,
            })?;
        let adjusted_series = SeriesSummary::from_values(bounds.begin_year, adjusted_values);
        let events = EventSummary::new(self.events.len(), &filtered.in_range, filtered.len());

        let windows = extract_windows(&self.series, &filtered, &self.window);
        let actual = lag_statistics(&windows);

        let null_distribution =
            simulate_null_distribution(&self.series, &filtered, &windows, &self.window, &self.config)?;
        let null = null_lag_statistics(&null_distribution, marks);
        let significance = evaluate_significance(&actual, &null, self.config.alpha_level);

        let analysis = SegmentAnalysis {
            adjusted_series,
            events,
            qualifying_events: filtered.qualifying.clone(),
            actual,
            null,
            significance,
            null_distribution,
        };

        log::info!(
            "segment {} ({}): {} events, significant lags {:?}",
            index + 1,
            label,
            filtered.len(),
            analysis.significant_lags()
        );

        Ok(SegmentResult {
            index,
            segment: *segment,
            label,
            initial_bounds,
            bounds,
            status: SegmentStatus::Ok,
            analysis: Some(analysis),
        })
    }
}
