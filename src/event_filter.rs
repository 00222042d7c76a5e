//! Event classification per segment.
//!
//! Decides which events take part in a segment's analysis under the
//! incomplete-epoch policy, records how far each event's window may reach
//! when truncation is allowed, and tightens the segment bounds around the
//! surviving events.

use crate::{
    bounds::AdjustedBounds,
    config::WindowSpec,
    series::{EventList, TimeSeries},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum number of events a segment needs to be analysed.
pub const MIN_EVENTS: usize = 2;

/// How far an event's window reaches inside the segment bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TruncatedExtent {
    /// `min(event - begin, prior_years)`
    pub prior: usize,
    /// `min(end - event, after_years)`
    pub after: usize,
}

/// Events that survived filtering for one segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilteredEvents {
    /// Bounds before tightening
    pub initial_bounds: AdjustedBounds,
    /// Bounds tightened around the qualifying events
    pub bounds: AdjustedBounds,
    /// Events inside the initial bounds with a series value
    pub in_range: Vec<i32>,
    /// Events eligible for windowing, ascending
    pub qualifying: Vec<i32>,
    /// Per qualifying event, present when incomplete epochs are included
    pub truncated: Option<Vec<TruncatedExtent>>,
}

impl FilteredEvents {
    /// Number of events used in the analysis.
    pub fn len(&self) -> usize {
        self.qualifying.len()
    }

    /// True when no event qualified.
    pub fn is_empty(&self) -> bool {
        self.qualifying.is_empty()
    }

    /// Inclusive range synthetic years for event `i` are drawn from.
    pub fn sampling_range(&self, i: usize, window: &WindowSpec) -> (i32, i32) {
        let (prior, after) = match &self.truncated {
            Some(extents) => (extents[i].prior as i32, extents[i].after as i32),
            None => (window.prior_i32(), window.after_i32()),
        };
        (
            self.bounds.begin_year.saturating_add(prior),
            self.bounds.end_year.saturating_sub(after),
        )
    }
}

/// Result of filtering one segment's events.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// At least two events qualified
    Usable(FilteredEvents),
    /// Fewer than two events in range or fewer than two qualifying
    InsufficientEvents {
        /// Events inside the bounds
        in_range: usize,
        /// Events eligible for windowing
        qualifying: usize,
        /// Bounds at the point of failure
        bounds: AdjustedBounds,
    },
    /// The bounds leave no room for a window
    DegenerateRange {
        /// The offending bounds
        bounds: AdjustedBounds,
    },
}

/// Classify `events` for a segment with initial `bounds`.
pub fn filter_events(
    series: &TimeSeries,
    events: &EventList,
    bounds: AdjustedBounds,
    window: &WindowSpec,
    include_incomplete_epochs: bool,
) -> FilterOutcome {
    if bounds.is_degenerate() {
        return FilterOutcome::DegenerateRange { bounds };
    }

    let in_range: Vec<i32> = events
        .years()
        .iter()
        .copied()
        .filter(|&year| bounds.contains(year) && series.value_at(year).is_some())
        .collect();

    if in_range.len() < MIN_EVENTS {
        return FilterOutcome::InsufficientEvents {
            in_range: in_range.len(),
            qualifying: 0,
            bounds,
        };
    }

    let prior = window.prior_i32();
    let after = window.after_i32();

    let (qualifying, truncated) = if include_incomplete_epochs {
        let extents = in_range
            .iter()
            .map(|&event| TruncatedExtent {
                prior: (event - bounds.begin_year).min(prior) as usize,
                after: (bounds.end_year - event).min(after) as usize,
            })
            .collect();
        (in_range.clone(), Some(extents))
    } else {
        let complete = in_range
            .iter()
            .copied()
            .filter(|&event| {
                event - bounds.begin_year >= prior && bounds.end_year - event >= after
            })
            .collect();
        (complete, None)
    };

    let tightened = match (qualifying.first(), qualifying.last()) {
        (Some(&first), Some(&last)) => AdjustedBounds::new(
            bounds.begin_year.max(first.saturating_sub(prior)),
            bounds.end_year.min(last.saturating_add(after)),
        ),
        _ => bounds,
    };

    if qualifying.len() < MIN_EVENTS {
        return FilterOutcome::InsufficientEvents {
            in_range: in_range.len(),
            qualifying: qualifying.len(),
            bounds: tightened,
        };
    }

    if tightened.is_degenerate() {
        return FilterOutcome::DegenerateRange { bounds: tightened };
    }

    log::debug!(
        "events: {} in range, {} qualifying, bounds {:?} -> {:?}",
        in_range.len(),
        qualifying.len(),
        bounds,
        tightened
    );

    FilterOutcome::Usable(FilteredEvents {
        initial_bounds: bounds,
        bounds: tightened,
        in_range,
        qualifying,
        truncated,
    })
}
