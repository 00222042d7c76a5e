//! # Superposed Epoch Analysis
//!
//! Tests whether an annual time series behaves anomalously in the years
//! around a set of key events, compared with what randomly placed events
//! would produce.
//!
//! Given a continuous series (a tree-ring chronology, a climate
//! reconstruction) and a list of event years (fires, eruptions), the
//! analysis stacks the series in a window of years around every event,
//! averages each lag, and compares those means with a Monte Carlo null
//! distribution built from synthetic event years.
//!
//! ## Key Features
//!
//! - **Segmented analysis**: split the record into year ranges, each analysed
//!   on its own with bounds tightened around its events
//! - **Incomplete epochs**: optionally keep events whose window runs past the
//!   analysed range
//! - **Reproducible null model**: seeded ChaCha20 streams per simulation,
//!   identical sequentially and on the rayon pool
//! - **Two kinds of intervals**: parametric and percentile intervals at the
//!   95%, 99% and 99.9% levels
//! - **Report output**: flattened tables, chart series, text tables and a
//!   chart-data CSV block
//!
//! ## Quick Start
//!
//! ```rust
//! use superposed_epoch::{
//!     assemble_report, EventList, RunConfig, Segment, SuperposedEpochAnalyzer, TimeSeries,
//!     WindowSpec,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Flat series with a drop in every event year
//!     let values: Vec<f64> = (1800..=1900)
//!         .map(|year| if year % 17 == 0 { 0.2 } else { 1.0 })
//!         .collect();
//!     let series = TimeSeries::new(1800, values)?;
//!     let events = EventList::new((1800..=1900).filter(|year| year % 17 == 0));
//!
//!     let config = RunConfig::quick().with_seed(7);
//!     let analyzer = SuperposedEpochAnalyzer::new(series, events, WindowSpec::default(), config.clone())?
//!         .with_segments(vec![Segment::new(1800, 1850), Segment::new(1851, 1900)]);
//!
//!     let results = analyzer.run()?;
//!     for segment in &results.segments {
//!         println!("{}: {:?}", segment.label, segment.status);
//!     }
//!
//!     let report = assemble_report(&results, &config);
//!     println!("{}", report.summary_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Data flows forward through one module per stage:
//! [`bounds`] → [`event_filter`] → [`window`] → [`descriptive`] and
//! [`monte_carlo`] → [`confidence_intervals`] → [`report`].
//! [`SuperposedEpochAnalyzer`] drives the stages segment by segment.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod analyzer;
pub mod config;
pub mod errors;
pub mod math_utils;
pub mod results;
pub mod secure_rng;
pub mod series;

// Pipeline stages
pub mod bounds;
pub mod confidence_intervals;
pub mod descriptive;
pub mod event_filter;
pub mod monte_carlo;
pub mod report;
pub mod window;

pub use analyzer::SuperposedEpochAnalyzer;
pub use bounds::{resolve_initial_bounds, AdjustedBounds};
pub use config::{AlphaLevel, RunConfig, WindowSpec};
pub use confidence_intervals::{
    ConfidenceInterval, ConfidenceIntervalMethod, LagSignificance, LevelIntervals,
    NullLagStatistics, PercentileMarks,
};
pub use descriptive::{EventSummary, LagStatistics, SeriesSummary};
pub use errors::{EpochAnalysisError, EpochResult};
pub use event_filter::{filter_events, FilterOutcome, FilteredEvents, TruncatedExtent};
pub use monte_carlo::{simulate_null_distribution, NullDistribution};
pub use report::{assemble_report, ChartPoint, ChartSeries, EpochReport, StatusRow, TableRow};
pub use results::{EpochAnalysisResults, SegmentAnalysis, SegmentResult, SegmentStatus};
pub use series::{EventList, Segment, TimeSeries};
pub use window::{extract_windows, EpochWindows};
