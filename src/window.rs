//! Epoch window extraction.
//!
//! Builds the per-lag validity mask over the qualifying events and gathers
//! the series values it selects. The mask is computed once from the real
//! events; the simulator applies the same mask to synthetic years.

use crate::{
    bounds::AdjustedBounds, config::WindowSpec, event_filter::FilteredEvents,
    series::TimeSeries,
};

/// Per-lag window contents for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochWindows {
    /// Lag for each offset `k`
    pub lags: Vec<i32>,
    /// `pattern[k][i]`: whether event `i` contributes to offset `k`
    pub pattern: Vec<Vec<bool>>,
    /// Series values selected by `pattern[k]`, in event order
    pub values: Vec<Vec<f64>>,
}

impl EpochWindows {
    /// Number of lag offsets.
    pub fn window_length(&self) -> usize {
        self.lags.len()
    }

    /// Number of events the mask covers.
    pub fn event_count(&self) -> usize {
        self.pattern.first().map_or(0, Vec::len)
    }

    /// Number of contributing events at offset `k`.
    pub fn count_at(&self, k: usize) -> usize {
        self.values[k].len()
    }
}

/// Validity mask for `events` at every lag of `window` within `bounds`.
pub fn window_pattern(events: &[i32], bounds: &AdjustedBounds, window: &WindowSpec) -> Vec<Vec<bool>> {
    window
        .lags()
        .map(|lag| {
            events
                .iter()
                .map(|&event| {
                    event
                        .checked_add(lag)
                        .is_some_and(|year| bounds.contains(year))
                })
                .collect()
        })
        .collect()
}

/// Extract the epoch windows of the qualifying events.
pub fn extract_windows(
    series: &TimeSeries,
    filtered: &FilteredEvents,
    window: &WindowSpec,
) -> EpochWindows {
    let pattern = window_pattern(&filtered.qualifying, &filtered.bounds, window);
    let lags: Vec<i32> = window.lags().collect();

    let values = lags
        .iter()
        .zip(&pattern)
        .map(|(&lag, mask)| {
            filtered
                .qualifying
                .iter()
                .zip(mask)
                .filter(|&(_, &valid)| valid)
                .filter_map(|(&event, _)| {
                    event
                        .checked_add(lag)
                        .and_then(|year| series.value_at(year))
                })
                .collect()
        })
        .collect();

    EpochWindows {
        lags,
        pattern,
        values,
    }
}
