//! Edge case and stability tests across the analysis pipeline.
//!
//! Covers series edges, incomplete epochs, degenerate windows and the
//! sampling ranges of the null model.

use assert_approx_eq::assert_approx_eq;
use superposed_epoch::secure_rng::SecureRng;
use superposed_epoch::*;

fn ramp(first_year: i32, years: usize) -> TimeSeries {
    TimeSeries::new(first_year, (0..years).map(|i| i as f64).collect()).unwrap()
}

/// Edge cases of incomplete epoch handling
mod incomplete_epochs {
    use super::*;

    #[test]
    fn test_edge_events_need_inclusion() {
        let series = ramp(1900, 30);
        let events = EventList::new(vec![1901, 1927]);
        let window = WindowSpec::new(5, 5).unwrap();

        let excluded = SuperposedEpochAnalyzer::new(
            series.clone(),
            events.clone(),
            window,
            RunConfig::quick(),
        )
        .unwrap()
        .run()
        .unwrap();
        assert!(matches!(
            excluded.segments[0].status,
            SegmentStatus::InsufficientEvents {
                in_range: 2,
                qualifying: 0
            }
        ));

        let included = SuperposedEpochAnalyzer::new(
            series,
            events,
            window,
            RunConfig::quick().with_incomplete_epochs(true),
        )
        .unwrap()
        .run()
        .unwrap();
        let segment = &included.segments[0];
        assert_eq!(segment.status, SegmentStatus::Ok);

        let analysis = segment.analysis.as_ref().unwrap();
        let lag_minus5 = &analysis.actual[0];
        assert_eq!(lag_minus5.lag, -5);
        assert_eq!(lag_minus5.count, 1);
        assert_approx_eq!(lag_minus5.mean, 22.0);

        let lag0 = &analysis.actual[5];
        assert_eq!(lag0.count, 2);
        assert_approx_eq!(lag0.mean, 14.0);
    }

    #[test]
    fn test_truncated_extents_bound_the_draws() {
        let series = ramp(1900, 30);
        let window = WindowSpec::new(5, 5).unwrap();
        let bounds = AdjustedBounds::new(1900, 1929);
        let filtered = match filter_events(
            &series,
            &EventList::new(vec![1901, 1915, 1927]),
            bounds,
            &window,
            true,
        ) {
            FilterOutcome::Usable(filtered) => filtered,
            other => panic!("Expected usable events, got {:?}", other),
        };

        let extents = filtered.truncated.as_ref().unwrap();
        assert_eq!(extents[0], TruncatedExtent { prior: 1, after: 5 });
        assert_eq!(extents[2], TruncatedExtent { prior: 5, after: 2 });

        let mut rng = SecureRng::with_seed(11);
        for _ in 0..500 {
            let years = monte_carlo::draw_synthetic_years(&filtered, &window, &mut rng);
            assert!(years.iter().all(|&y| (1901..=1927).contains(&y)));
        }
    }

    #[test]
    fn test_null_model_runs_with_truncated_windows() {
        let series = ramp(1900, 30);
        let results = SuperposedEpochAnalyzer::new(
            series,
            EventList::new(vec![1900, 1929]),
            WindowSpec::new(3, 3).unwrap(),
            RunConfig::standard().with_incomplete_epochs(true),
        )
        .unwrap()
        .run()
        .unwrap();

        let analysis = results.segments[0].analysis.as_ref().unwrap();
        assert_eq!(analysis.null_distribution.window_length(), 7);
        for null in &analysis.null {
            assert!(null.mean.is_finite());
            assert!(null.std_dev >= 0.0);
        }
    }
}

/// Sampling ranges of the null model
mod sampling_ranges {
    use super::*;

    #[test]
    fn test_excluded_epochs_use_configured_window() {
        let series = TimeSeries::new(1700, vec![1.0; 200]).unwrap();
        let window = WindowSpec::new(10, 1).unwrap();
        let filtered = match filter_events(
            &series,
            &EventList::new(vec![1720, 1760, 1800, 1850]),
            AdjustedBounds::new(1700, 1899),
            &window,
            false,
        ) {
            FilterOutcome::Usable(filtered) => filtered,
            other => panic!("Expected usable events, got {:?}", other),
        };
        assert_eq!(filtered.bounds, AdjustedBounds::new(1710, 1851));

        let low = filtered.bounds.begin_year + 10;
        let high = filtered.bounds.end_year - 1;
        let mut rng = SecureRng::with_seed(2024);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..5000 {
            for year in monte_carlo::draw_synthetic_years(&filtered, &window, &mut rng) {
                assert!((low..=high).contains(&year), "year {} outside [{}, {}]", year, low, high);
                seen_low |= year == low;
                seen_high |= year == high;
            }
        }
        assert!(seen_low && seen_high);
    }

    #[test]
    fn test_zero_width_window() {
        let series = ramp(2000, 21);
        let results = SuperposedEpochAnalyzer::new(
            series,
            EventList::new(vec![2000, 2010, 2020]),
            WindowSpec::new(0, 0).unwrap(),
            RunConfig::quick(),
        )
        .unwrap()
        .run()
        .unwrap();

        let analysis = results.segments[0].analysis.as_ref().unwrap();
        assert_eq!(analysis.actual.len(), 1);
        assert_approx_eq!(analysis.actual[0].mean, 10.0);
        assert_eq!(results.segments[0].bounds, AdjustedBounds::new(2000, 2020));
    }
}

/// Segment layouts
mod segments {
    use super::*;

    #[test]
    fn test_overlapping_segments_are_independent() {
        let series = ramp(1800, 100);
        let events = EventList::new(vec![1810, 1830, 1850, 1870, 1890]);
        let results = SuperposedEpochAnalyzer::new(
            series,
            events,
            WindowSpec::new(2, 2).unwrap(),
            RunConfig::quick(),
        )
        .unwrap()
        .with_segments(vec![
            Segment::new(1800, 1860),
            Segment::new(1840, 1899),
            Segment::new(1800, 1860),
        ])
        .run()
        .unwrap();

        assert_eq!(results.segments.len(), 3);
        assert_eq!(results.segments[0].label, "1800 - 1860");
        assert_eq!(results.segments[1].index, 1);
        // Identical segments see identical statistics
        let first = results.segments[0].analysis.as_ref().unwrap();
        let third = results.segments[2].analysis.as_ref().unwrap();
        assert_eq!(first.actual, third.actual);
        assert_eq!(first.null_distribution, third.null_distribution);
    }

    #[test]
    fn test_series_and_segment_summaries() {
        let series = ramp(1800, 100);
        let results = SuperposedEpochAnalyzer::new(
            series,
            EventList::new(vec![1810, 1830, 1850]),
            WindowSpec::new(2, 2).unwrap(),
            RunConfig::quick(),
        )
        .unwrap()
        .run()
        .unwrap();

        assert_eq!(results.series_summary.years, 100);
        assert_approx_eq!(results.series_summary.mean, 49.5);
        assert_approx_eq!(results.series_summary.median, 49.5);
        assert_approx_eq!(results.series_summary.skewness, 0.0);

        let analysis = results.segments[0].analysis.as_ref().unwrap();
        assert_eq!(results.segments[0].bounds, AdjustedBounds::new(1808, 1852));
        assert_eq!(analysis.adjusted_series.years, 45);
        assert_approx_eq!(analysis.adjusted_series.mean, 30.0);
        assert_eq!(analysis.events.in_range, 3);
        assert_approx_eq!(analysis.events.mean_years_between, 20.0);
        assert_eq!(analysis.events.min_difference, Some(20));
    }

    #[test]
    fn test_single_year_series() {
        let series = TimeSeries::new(1950, vec![3.0]).unwrap();
        let results = SuperposedEpochAnalyzer::new(
            series,
            EventList::new(vec![1950]),
            WindowSpec::default(),
            RunConfig::quick(),
        )
        .unwrap()
        .run()
        .unwrap();
        assert!(results.segments[0].status.is_bad());
        assert_eq!(results.series_summary.years, 1);
        assert!(results.series_summary.skewness.is_nan());
    }
}

/// Percentile ranks for unusual simulation counts
mod percentile_marks {
    use super::*;

    #[test]
    fn test_single_simulation_run() {
        let results = SuperposedEpochAnalyzer::new(
            ramp(1900, 50),
            EventList::new(vec![1910, 1920, 1930]),
            WindowSpec::new(2, 2).unwrap(),
            RunConfig::quick().with_simulations(1),
        )
        .unwrap()
        .run()
        .unwrap();

        assert_eq!(results.percentile_marks.ranks(AlphaLevel::P95), (0, 0));
        let analysis = results.segments[0].analysis.as_ref().unwrap();
        for null in &analysis.null {
            assert_eq!(null.std_dev, 0.0);
            let percentile = null.percentile.at(AlphaLevel::P95);
            assert_eq!(percentile.lower_bound, percentile.upper_bound);
            assert_eq!(percentile.lower_bound, null.mean);
        }
    }
}

/// Series that touch the ends of the year range
mod year_limits {
    use super::*;

    #[test]
    fn test_series_ending_at_max_year() {
        let last = i32::MAX;
        let results = SuperposedEpochAnalyzer::new(
            ramp(last - 20, 21),
            EventList::new(vec![last - 10, last - 2]),
            WindowSpec::new(2, 4).unwrap(),
            RunConfig::quick().with_incomplete_epochs(true),
        )
        .unwrap()
        .run()
        .unwrap();

        let segment = &results.segments[0];
        assert_eq!(segment.status, SegmentStatus::Ok);
        assert_eq!(segment.bounds, AdjustedBounds::new(last - 12, last));

        let analysis = segment.analysis.as_ref().unwrap();
        // Lags -2..=4
        assert_approx_eq!(analysis.actual[2].mean, 14.0);
        assert_approx_eq!(analysis.actual[4].mean, 16.0);
        assert_eq!(analysis.actual[5].count, 1);
        assert_eq!(analysis.actual[6].count, 1);
        assert_approx_eq!(analysis.actual[6].mean, 14.0);
        for null in &analysis.null {
            assert!(null.mean.is_finite());
        }
    }

    #[test]
    fn test_series_starting_at_min_year() {
        let first = i32::MIN;
        let results = SuperposedEpochAnalyzer::new(
            ramp(first, 21),
            EventList::new(vec![first + 2, first + 10]),
            WindowSpec::new(4, 2).unwrap(),
            RunConfig::quick().with_incomplete_epochs(true),
        )
        .unwrap()
        .run()
        .unwrap();

        let segment = &results.segments[0];
        assert_eq!(segment.status, SegmentStatus::Ok);
        assert_eq!(segment.bounds, AdjustedBounds::new(first, first + 12));

        let analysis = segment.analysis.as_ref().unwrap();
        // Lags -4..=2
        assert_eq!(analysis.actual[0].count, 1);
        assert_approx_eq!(analysis.actual[0].mean, 6.0);
        assert_approx_eq!(analysis.actual[4].mean, 6.0);
        for null in &analysis.null {
            assert!(null.mean.is_finite());
        }
    }
}
