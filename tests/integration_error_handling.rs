//! Integration tests for error handling and invalid input scenarios
//!
//! Configuration errors must abort a run before any segment is processed,
//! while per-segment problems are reported through the segment status.

use std::sync::atomic::AtomicBool;
use superposed_epoch::{
    errors::EpochAnalysisError, EventList, RunConfig, Segment, SegmentStatus,
    SuperposedEpochAnalyzer, TimeSeries, WindowSpec,
};

fn series() -> TimeSeries {
    let values = (0..100).map(|i| (i as f64 * 0.3).cos() + 2.0).collect();
    TimeSeries::new(1850, values).unwrap()
}

/// Test scenario: zero simulations is an invalid configuration
#[test]
fn test_zero_simulations_fails_fast() {
    let result = SuperposedEpochAnalyzer::new(
        series(),
        EventList::new(vec![1870, 1890, 1910]),
        WindowSpec::default(),
        RunConfig::standard().with_simulations(0),
    );

    match result {
        Err(EpochAnalysisError::InvalidParameter {
            parameter, value, ..
        }) => {
            assert_eq!(parameter, "number_of_simulations");
            assert_eq!(value, 0.0);
        }
        other => panic!("Expected InvalidParameter error, got {:?}", other),
    }
}

/// Test scenario: negative window extents are rejected
#[test]
fn test_negative_window_is_rejected() {
    for (prior, after, name) in [(-1, 4, "prior_years"), (6, -2, "after_years")] {
        match WindowSpec::new(prior, after) {
            Err(EpochAnalysisError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, name);
            }
            other => panic!("Expected InvalidParameter error, got {:?}", other),
        }
    }
}

/// Test scenario: malformed series never reach the analyzer
#[test]
fn test_invalid_series_is_rejected() {
    assert!(matches!(
        TimeSeries::new(1900, vec![1.0, f64::INFINITY, 2.0]),
        Err(EpochAnalysisError::InvalidSeries { .. })
    ));
    assert!(matches!(
        TimeSeries::new(1900, Vec::new()),
        Err(EpochAnalysisError::InvalidSeries { .. })
    ));
    assert!(matches!(
        TimeSeries::from_pairs(&[(1900, 1.0), (1901, 1.0), (1903, 1.0)]),
        Err(EpochAnalysisError::InvalidSeries { .. })
    ));

    let err = TimeSeries::new(1900, vec![1.0, f64::NAN]).unwrap_err();
    assert!(err.to_string().contains("NaN"));
}

/// Test scenario: cancellation is honoured before the first segment
#[test]
fn test_cancellation_flag() {
    let analyzer = SuperposedEpochAnalyzer::new(
        series(),
        EventList::new(vec![1870, 1890, 1910]),
        WindowSpec::default(),
        RunConfig::quick(),
    )
    .unwrap()
    .with_segments(vec![Segment::new(1850, 1900), Segment::new(1901, 1949)]);

    let cancel = AtomicBool::new(true);
    match analyzer.run_with_cancellation(&cancel) {
        Err(EpochAnalysisError::Cancelled { segment_index }) => assert_eq!(segment_index, 0),
        other => panic!("Expected Cancelled error, got {:?}", other),
    }

    let proceed = AtomicBool::new(false);
    let results = analyzer.run_with_cancellation(&proceed).unwrap();
    assert_eq!(results.segments.len(), 2);
}

/// Test scenario: segment problems are statuses, not errors
#[test]
fn test_bad_segments_do_not_abort_the_run() {
    let results = SuperposedEpochAnalyzer::new(
        series(),
        EventList::new(vec![1870, 1890, 1910, 1925]),
        WindowSpec::default(),
        RunConfig::quick(),
    )
    .unwrap()
    .with_segments(vec![
        Segment::new(1700, 1800),
        Segment::new(1860, 1930),
        Segment::new(1940, 1920),
        Segment::new(1926, 1949),
    ])
    .run()
    .unwrap();

    let statuses: Vec<SegmentStatus> = results.segments.iter().map(|s| s.status).collect();
    assert!(matches!(statuses[0], SegmentStatus::DegenerateRange { .. }));
    assert_eq!(statuses[1], SegmentStatus::Ok);
    assert!(matches!(
        statuses[2],
        SegmentStatus::DegenerateRange {
            begin: 1940,
            end: 1920
        }
    ));
    assert!(matches!(
        statuses[3],
        SegmentStatus::InsufficientEvents {
            in_range: 0,
            qualifying: 0
        }
    ));
    assert_eq!(results.bad_segments().count(), 3);
    assert!(results.segments.iter().all(|s| s.status.is_ok() == s.analysis.is_some()));
}

/// Test scenario: error messages carry their context
#[test]
fn test_error_display() {
    let err = EpochAnalysisError::WindowOutOfSeries { year: 2031 };
    assert_eq!(err.to_string(), "Window position 2031 lies outside the time series");

    let err = EpochAnalysisError::Cancelled { segment_index: 3 };
    assert!(err.to_string().contains('3'));
}
