//! Report and chart assembly.
//!
//! Flattens [`EpochAnalysisResults`] into table rows and chart series in
//! segment order, and renders the plain-text tables, the chart-data CSV
//! block and the narrative summary.

use crate::{
    bounds::AdjustedBounds,
    config::{AlphaLevel, RunConfig, WindowSpec},
    confidence_intervals::{ConfidenceInterval, LevelIntervals},
    descriptive::{EventSummary, SeriesSummary},
    results::{EpochAnalysisResults, SegmentStatus},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One row of the actual or simulation table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableRow {
    /// Segment label
    pub segment: String,
    /// Lag relative to the event year
    pub lag: i32,
    /// Mean
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
    /// Interval at the report's alpha level
    pub interval: ConfidenceInterval,
    /// Minimum
    pub min: f64,
    /// Maximum
    pub max: f64,
}

/// One lag of a segment chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartPoint {
    /// Lag relative to the event year
    pub lag: i32,
    /// Mean of the actual windows
    pub actual_mean: f64,
    /// Parametric null intervals at every level
    pub null_intervals: LevelIntervals,
    /// Significance at the report's alpha level
    pub significant: bool,
}

/// Chart data for one `Ok` segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartSeries {
    /// Segment label
    pub segment: String,
    /// Tightened bounds
    pub bounds: AdjustedBounds,
    /// One point per lag
    pub points: Vec<ChartPoint>,
}

/// A segment that produced no numeric rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusRow {
    /// Position in the segment list
    pub index: usize,
    /// Segment label
    pub segment: String,
    /// Bounds at the point the segment was skipped
    pub bounds: AdjustedBounds,
    /// Why it was skipped
    pub status: SegmentStatus,
}

/// Per-segment block of the narrative summary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentSection {
    /// Segment label
    pub segment: String,
    /// Bounds after clamping
    pub initial_bounds: AdjustedBounds,
    /// Bounds after tightening
    pub bounds: AdjustedBounds,
    /// Outcome
    pub status: SegmentStatus,
    /// Adjusted series summary, for `Ok` segments
    pub adjusted_series: Option<SeriesSummary>,
    /// Key-event summary, for `Ok` segments
    pub events: Option<EventSummary>,
}

/// Flattened, presentation-ready view of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochReport {
    /// Report title
    pub title: String,
    /// Name of the continuous series
    pub series_label: String,
    /// Level of the table intervals and chart flags
    pub alpha_level: AlphaLevel,
    /// Simulations per segment
    pub number_of_simulations: usize,
    /// Run seed
    pub seed: u64,
    /// Epoch window
    pub window: WindowSpec,
    /// Summary of the whole series
    pub series_summary: SeriesSummary,
    /// Narrative blocks, one per segment
    pub sections: Vec<SegmentSection>,
    /// Actual-data table rows
    pub actual_rows: Vec<TableRow>,
    /// Null-model table rows
    pub simulation_rows: Vec<TableRow>,
    /// Chart series, one per `Ok` segment
    pub charts: Vec<ChartSeries>,
    /// Skipped segments
    pub status_rows: Vec<StatusRow>,
}

/// Build the report for `results`.
pub fn assemble_report(results: &EpochAnalysisResults, config: &RunConfig) -> EpochReport {
    let level = results.alpha_level;
    let mut report = EpochReport {
        title: config.title.clone(),
        series_label: config.series_label.clone(),
        alpha_level: level,
        number_of_simulations: results.number_of_simulations,
        seed: results.seed,
        window: results.window,
        series_summary: results.series_summary.clone(),
        sections: Vec::with_capacity(results.segments.len()),
        actual_rows: Vec::new(),
        simulation_rows: Vec::new(),
        charts: Vec::new(),
        status_rows: Vec::new(),
    };

    for segment in &results.segments {
        report.sections.push(SegmentSection {
            segment: segment.label.clone(),
            initial_bounds: segment.initial_bounds,
            bounds: segment.bounds,
            status: segment.status,
            adjusted_series: segment.analysis.as_ref().map(|a| a.adjusted_series.clone()),
            events: segment.analysis.as_ref().map(|a| a.events.clone()),
        });

        let analysis = match &segment.analysis {
            Some(analysis) if segment.status.is_ok() => analysis,
            _ => {
                report.status_rows.push(StatusRow {
                    index: segment.index,
                    segment: segment.label.clone(),
                    bounds: segment.bounds,
                    status: segment.status,
                });
                continue;
            }
        };

        report
            .actual_rows
            .extend(analysis.actual.iter().map(|stats| TableRow {
                segment: segment.label.clone(),
                lag: stats.lag,
                mean: stats.mean,
                std_dev: stats.std_dev,
                interval: stats.interval(level).clone(),
                min: stats.min,
                max: stats.max,
            }));

        report
            .simulation_rows
            .extend(analysis.null.iter().map(|stats| TableRow {
                segment: segment.label.clone(),
                lag: stats.lag,
                mean: stats.mean,
                std_dev: stats.std_dev,
                interval: stats.parametric.at(level).clone(),
                min: stats.min,
                max: stats.max,
            }));

        let points = analysis
            .actual
            .iter()
            .zip(&analysis.null)
            .zip(&analysis.significance)
            .map(|((actual, null), flag)| ChartPoint {
                lag: actual.lag,
                actual_mean: actual.mean,
                null_intervals: null.parametric.clone(),
                significant: flag.significant,
            })
            .collect();

        report.charts.push(ChartSeries {
            segment: segment.label.clone(),
            bounds: segment.bounds,
            points,
        });
    }

    report
}

fn table_header(level: AlphaLevel) -> String {
    format!(
        "{:<12}\t{:<8}\t{:<8}\t{:<8}\t{:<20}\t{:<8}\t{:<8}",
        "SEGMENT",
        "LAGS",
        "MEAN",
        "STA DEV",
        format!("{} CONF INT", level.label()),
        "MIN",
        "MAX"
    )
}

fn table_line(row: &TableRow) -> String {
    format!(
        "{:<12}\t{:<8}\t{:<8.3}\t{:<8.3}\t{:<20}\t{:<8.3}\t{:<8.3}",
        row.segment,
        row.lag,
        row.mean,
        row.std_dev,
        format!(
            "[{:.3},{:.3}]",
            row.interval.lower_bound, row.interval.upper_bound
        ),
        row.min,
        row.max
    )
}

fn render_table(level: AlphaLevel, rows: &[TableRow]) -> String {
    let mut out = table_header(level);
    out.push('\n');
    for row in rows {
        out.push_str(&table_line(row));
        out.push('\n');
    }
    out
}

impl EpochReport {
    /// Actual-data table, tab separated with three decimals.
    pub fn actual_table_text(&self) -> String {
        render_table(self.alpha_level, &self.actual_rows)
    }

    /// Null-model table in the same layout.
    pub fn simulation_table_text(&self) -> String {
        render_table(self.alpha_level, &self.simulation_rows)
    }

    /// Chart data for every segment as comma separated blocks.
    ///
    /// Each block starts with `Range:` and the tightened bounds, followed by
    /// one row per lag with the actual mean and the null intervals at all
    /// three levels. Skipped segments get a status line instead.
    pub fn chart_data_csv(&self) -> String {
        let mut lines = Vec::new();
        let mut charts = self.charts.iter();

        for (index, section) in self.sections.iter().enumerate() {
            lines.push("Range:".to_string());
            lines.push(format!(
                "{},{}",
                section.bounds.begin_year, section.bounds.end_year
            ));

            if section.status.is_bad() {
                lines.push(format!(
                    "Segment {}: {}",
                    index + 1,
                    section.status.describe()
                ));
                continue;
            }

            let Some(chart) = charts.next() else {
                continue;
            };
            let mut header = String::from("Lags,Events Mean");
            for level in AlphaLevel::ALL {
                header.push_str(&format!(",{0} CONF INT,{0} CONF INT", level.label()));
            }
            lines.push(header);

            for point in &chart.points {
                let mut line = format!("{},{:.3}", point.lag, point.actual_mean);
                for interval in point.null_intervals.iter() {
                    line.push_str(&format!(
                        ",{:.3},{:.3}",
                        interval.lower_bound, interval.upper_bound
                    ));
                }
                lines.push(line);
            }
        }
        join_lines(lines)
    }

    /// Narrative summary of the whole run.
    pub fn summary_text(&self) -> String {
        let mut lines = vec![self.title.to_uppercase()];
        if !self.series_label.is_empty() {
            lines.push(format!("Time series: {}", self.series_label));
        }
        lines.push(format!(
            "Window: {} years prior, {} years after ({} lags)",
            self.window.prior_years(),
            self.window.after_years(),
            self.window.window_length()
        ));
        lines.push(String::new());
        lines.push("DESCRIPTIVE STATISTICS OF THE CONTINUOUS TIME SERIES:".to_string());
        lines.extend(series_summary_lines(&self.series_summary));

        let lags = self.window.window_length();
        let mut actual = self.actual_rows.iter();
        let mut simulated = self.simulation_rows.iter();

        for (index, section) in self.sections.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("SEGMENT {}: {}", index + 1, section.segment));

            let (Some(series), Some(events)) = (&section.adjusted_series, &section.events) else {
                lines.push(format!(
                    "\tYears {} to {}: {}",
                    section.bounds.begin_year,
                    section.bounds.end_year,
                    section.status.describe()
                ));
                continue;
            };

            lines.push("DESCRIPTIVE STATISTICS OF THE ADJUSTED TIME SERIES:".to_string());
            lines.extend(series_summary_lines(series));

            lines.push("KEY EVENTS:".to_string());
            lines.push(format!("\tNumber of key events: {}", events.total_events));
            lines.push(format!("\tNumber of key events in range: {}", events.in_range));
            lines.push(format!("\tNumber of key events used in analysis: {}", events.used));
            lines.push(format!(
                "\tMean years between events is {:.3}",
                events.mean_years_between
            ));
            if let Some(min) = events.min_difference {
                lines.push(format!("\tMinimum difference is {}", min));
            }

            lines.push("ACTUAL EVENTS:".to_string());
            lines.push(table_header(self.alpha_level));
            lines.extend(actual.by_ref().take(lags).map(table_line));

            lines.push("SIMULATIONS:".to_string());
            lines.push(format!("\tNumber of simulations: {}", self.number_of_simulations));
            lines.push(format!("\tRandom seed: {}", self.seed));
            lines.push(table_header(self.alpha_level));
            lines.extend(simulated.by_ref().take(lags).map(table_line));
        }
        join_lines(lines)
    }
}

/// Newline-terminated text from `lines`.
fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    if !lines.is_empty() {
        out.push('\n');
    }
    out
}

fn series_summary_lines(summary: &SeriesSummary) -> [String; 9] {
    [
        format!("\tRange: {} to {}", summary.first_year, summary.last_year),
        format!("\tNumber of years: {}", summary.years),
        format!("\tMean: {:.3}", summary.mean),
        format!("\tMedian: {:.3}", summary.median),
        format!("\tMean sensitivity: {:.3}", summary.mean_sensitivity),
        format!("\tStandard deviation: {:.3}", summary.std_dev),
        format!("\tSkewness: {:.3}", summary.skewness),
        format!("\tKurtosis: {:.3}", summary.kurtosis),
        format!("\tFirst order autocorrelation: {:.3}", summary.autocorrelation),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::SuperposedEpochAnalyzer,
        series::{EventList, Segment, TimeSeries},
    };

    fn report() -> EpochReport {
        let values: Vec<f64> = (0..41).map(|i| ((i * 13) % 7) as f64).collect();
        let series = TimeSeries::new(1980, values).unwrap();
        let config = RunConfig::quick().with_simulations(40);
        let results = SuperposedEpochAnalyzer::new(
            series,
            EventList::new(vec![1985, 1990, 2000, 2010]),
            WindowSpec::new(2, 1).unwrap(),
            config.clone(),
        )
        .unwrap()
        .with_segments(vec![
            Segment::new(1980, 2000),
            Segment::new(2015, 2020),
            Segment::all_years(),
        ])
        .run()
        .unwrap();
        assemble_report(&results, &config)
    }

    #[test]
    fn test_rows_follow_segment_order() {
        let report = report();
        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.actual_rows.len(), 8);
        assert_eq!(report.simulation_rows.len(), 8);
        assert_eq!(report.charts.len(), 2);
        assert_eq!(report.status_rows.len(), 1);
        assert_eq!(report.status_rows[0].index, 1);

        assert_eq!(report.actual_rows[0].segment, "1980 - 2000");
        assert_eq!(report.actual_rows[4].segment, "1980 - 2020");
        let lags: Vec<i32> = report.actual_rows[..4].iter().map(|r| r.lag).collect();
        assert_eq!(lags, vec![-2, -1, 0, 1]);
    }

    #[test]
    fn test_table_text() {
        let report = report();
        let text = report.actual_table_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("SEGMENT"));
        assert!(lines[0].contains("95% CONF INT"));
        assert!(lines[1].starts_with("1980 - 2000"));
        assert_eq!(lines[1].split('\t').count(), 7);

        assert_eq!(report.simulation_table_text().lines().count(), 9);
    }

    #[test]
    fn test_chart_csv_blocks() {
        let csv = report().chart_data_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Range:");
        assert!(lines[2].starts_with("Lags,Events Mean,95% CONF INT"));
        assert!(lines[2].contains("99.9% CONF INT"));
        assert_eq!(lines[3].split(',').count(), 8);
        assert!(lines[3].starts_with("-2,"));
        assert!(csv.contains("Segment 2: not enough events"));
    }

    #[test]
    fn test_summary_mentions_every_segment() {
        let summary = report().summary_text();
        assert!(summary.starts_with("SUPERPOSED EPOCH ANALYSIS"));
        assert!(summary.contains("SEGMENT 1: 1980 - 2000"));
        assert!(summary.contains("SEGMENT 2: 2015 - 2020"));
        assert!(summary.contains("not enough events"));
        assert!(summary.contains("Random seed: 30188"));
        assert!(summary.contains("Number of simulations: 40"));
    }

    #[test]
    fn test_rendered_text_line_layout() {
        let report = report();

        let csv = report.chart_data_csv();
        assert!(csv.ends_with('\n'));
        // Two charted blocks of 3 + 4 lines and one 3-line status block
        assert_eq!(csv.lines().count(), 17);

        let summary = report.summary_text();
        assert!(summary.ends_with('\n'));
        assert!(!summary.ends_with("\n\n"));
        assert_eq!(summary.lines().filter(|line| line.is_empty()).count(), 4);
        assert_eq!(summary.matches("ACTUAL EVENTS:").count(), 2);
    }
}
