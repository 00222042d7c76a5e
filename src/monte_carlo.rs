//! Monte Carlo null model for superposed epoch analysis.
//!
//! Each simulation replaces the qualifying events with the same number of
//! uniformly drawn years, sorts them, and averages the series under the
//! validity mask of the real events. The per-lag means of all simulations
//! form the null distribution the actual means are judged against.
//!
//! ## Reproducibility
//!
//! Simulation `s` draws from its own ChaCha20 stream seeded with
//! `mix_seed(seed, s)`. Results are collected by simulation index, so a run
//! is bit-identical whether it executes sequentially or on the rayon pool.

use crate::{
    config::{RunConfig, WindowSpec},
    errors::{EpochAnalysisError, EpochResult},
    event_filter::FilteredEvents,
    math_utils::mean,
    secure_rng::SecureRng,
    series::TimeSeries,
    window::EpochWindows,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Simulated lag means stored as a `[lag][simulation]` arena.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NullDistribution {
    lags: Vec<i32>,
    simulations: usize,
    means: Vec<Vec<f64>>,
}

impl NullDistribution {
    /// Lags in offset order.
    pub fn lags(&self) -> &[i32] {
        &self.lags
    }

    /// Number of simulations.
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Number of lag offsets.
    pub fn window_length(&self) -> usize {
        self.lags.len()
    }

    /// Simulated means at offset `k`, in simulation order.
    pub fn lag_means(&self, k: usize) -> &[f64] {
        &self.means[k]
    }

    /// Iterator over `(lag, means)` in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[f64])> + '_ {
        self.lags
            .iter()
            .zip(&self.means)
            .map(|(&lag, means)| (lag, means.as_slice()))
    }

    fn from_simulations(lags: Vec<i32>, per_simulation: Vec<Vec<f64>>) -> Self {
        let simulations = per_simulation.len();
        let mut means = vec![Vec::with_capacity(simulations); lags.len()];
        for simulation in per_simulation {
            for (k, value) in simulation.into_iter().enumerate() {
                means[k].push(value);
            }
        }
        Self {
            lags,
            simulations,
            means,
        }
    }
}

/// Draw one set of synthetic event years, sorted ascending.
pub fn draw_synthetic_years(
    filtered: &FilteredEvents,
    window: &WindowSpec,
    rng: &mut SecureRng,
) -> Vec<i32> {
    let mut years: Vec<i32> = (0..filtered.len())
        .map(|i| {
            let (low, high) = filtered.sampling_range(i, window);
            rng.year_in(low, high)
        })
        .collect();
    years.sort_unstable();
    years
}

/// Per-lag means of one simulation.
fn simulate_once(
    series: &TimeSeries,
    filtered: &FilteredEvents,
    windows: &EpochWindows,
    window: &WindowSpec,
    rng: &mut SecureRng,
) -> EpochResult<Vec<f64>> {
    let years = draw_synthetic_years(filtered, window, rng);

    windows
        .lags
        .iter()
        .zip(&windows.pattern)
        .map(|(&lag, mask)| {
            let values = years
                .iter()
                .zip(mask)
                .filter(|&(_, &valid)| valid)
                .map(|(&year, _)| {
                    year.checked_add(lag)
                        .and_then(|target| series.value_at(target))
                        .ok_or(EpochAnalysisError::WindowOutOfSeries {
                            year: year.saturating_add(lag),
                        })
                })
                .collect::<EpochResult<Vec<f64>>>()?;
            Ok(mean(&values))
        })
        .collect()
}

/// Run `config.number_of_simulations` simulations for one segment.
pub fn simulate_null_distribution(
    series: &TimeSeries,
    filtered: &FilteredEvents,
    windows: &EpochWindows,
    window: &WindowSpec,
    config: &RunConfig,
) -> EpochResult<NullDistribution> {
    let simulations = config.number_of_simulations;
    let seed = config.seed;

    let run = |s: usize| {
        let mut rng = SecureRng::for_simulation(seed, s);
        simulate_once(series, filtered, windows, window, &mut rng)
    };

    #[cfg(feature = "parallel")]
    let per_simulation: EpochResult<Vec<Vec<f64>>> = if config.parallel {
        use rayon::prelude::*;
        (0..simulations).into_par_iter().map(run).collect()
    } else {
        (0..simulations).map(run).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let per_simulation: EpochResult<Vec<Vec<f64>>> = (0..simulations).map(run).collect();

    let per_simulation = per_simulation?;
    log::debug!(
        "simulated {} synthetic event sets of {} events over {:?}",
        simulations,
        filtered.len(),
        filtered.bounds
    );

    Ok(NullDistribution::from_simulations(
        windows.lags.clone(),
        per_simulation,
    ))
}
