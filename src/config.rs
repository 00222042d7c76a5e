//! # Analysis Configuration
//!
//! Window geometry, alpha levels and Monte Carlo settings for a run.
//! Everything here is validated up front by [`RunConfig::validate`] so that a
//! bad configuration fails before any segment is processed.

use crate::errors::{validate_min_count, validate_non_negative, EpochResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default years before the event
pub const DEFAULT_PRIOR_YEARS: usize = 6;
/// Default years after the event
pub const DEFAULT_AFTER_YEARS: usize = 4;
/// Default number of Monte Carlo simulations
pub const DEFAULT_NUMBER_OF_SIMULATIONS: usize = 1000;
/// Default RNG seed
pub const DEFAULT_SEED: u64 = 30188;

/// Epoch window around each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowSpec {
    prior_years: usize,
    after_years: usize,
}

impl WindowSpec {
    /// Build a window spec, rejecting negative extents.
    pub fn new(prior_years: i32, after_years: i32) -> EpochResult<Self> {
        validate_non_negative(prior_years, "prior_years")?;
        validate_non_negative(after_years, "after_years")?;
        Ok(Self {
            prior_years: prior_years as usize,
            after_years: after_years as usize,
        })
    }

    /// Years before the event.
    pub fn prior_years(&self) -> usize {
        self.prior_years
    }

    /// Years after the event.
    pub fn after_years(&self) -> usize {
        self.after_years
    }

    /// `prior + after + 1`.
    pub fn window_length(&self) -> usize {
        self.prior_years + self.after_years + 1
    }

    /// Lag value for window offset `k`, ranging `-prior..=after`.
    pub fn lag(&self, k: usize) -> i32 {
        k as i32 - self.prior_years as i32
    }

    /// All lags in offset order.
    pub fn lags(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.window_length()).map(move |k| self.lag(k))
    }

    pub(crate) fn prior_i32(&self) -> i32 {
        self.prior_years as i32
    }

    pub(crate) fn after_i32(&self) -> i32 {
        self.after_years as i32
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            prior_years: DEFAULT_PRIOR_YEARS,
            after_years: DEFAULT_AFTER_YEARS,
        }
    }
}

/// Confidence level used for intervals and significance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlphaLevel {
    /// 95% two-sided
    #[default]
    P95,
    /// 99% two-sided
    P99,
    /// 99.9% two-sided
    P999,
}

impl AlphaLevel {
    /// All levels, in table order.
    pub const ALL: [AlphaLevel; 3] = [AlphaLevel::P95, AlphaLevel::P99, AlphaLevel::P999];

    /// Fixed two-sided normal multiplier.
    pub fn multiplier(&self) -> f64 {
        match self {
            AlphaLevel::P95 => 1.960,
            AlphaLevel::P99 => 2.575,
            AlphaLevel::P999 => 3.294,
        }
    }

    /// Position in [`AlphaLevel::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AlphaLevel::P95 => 0,
            AlphaLevel::P99 => 1,
            AlphaLevel::P999 => 2,
        }
    }

    /// Confidence level as a fraction, e.g. 0.95.
    pub fn confidence_level(&self) -> f64 {
        match self {
            AlphaLevel::P95 => 0.95,
            AlphaLevel::P99 => 0.99,
            AlphaLevel::P999 => 0.999,
        }
    }

    /// Divisor `d` such that `N / d` simulations sit in each percentile tail.
    pub fn tail_divisor(&self) -> f64 {
        match self {
            AlphaLevel::P95 => 40.0,
            AlphaLevel::P99 => 200.0,
            AlphaLevel::P999 => 2000.0,
        }
    }

    /// Table label, e.g. `"95%"`.
    pub fn label(&self) -> &'static str {
        match self {
            AlphaLevel::P95 => "95%",
            AlphaLevel::P99 => "99%",
            AlphaLevel::P999 => "99.9%",
        }
    }
}

/// Settings for one analysis invocation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunConfig {
    /// Number of Monte Carlo simulations (at least 1)
    pub number_of_simulations: usize,
    /// Seed for the simulation RNG
    pub seed: u64,
    /// Keep events whose window runs past the analysed range
    pub include_incomplete_epochs: bool,
    /// Level used for significance flags and single-level tables
    pub alpha_level: AlphaLevel,
    /// Run simulations on the rayon pool when the `parallel` feature is on
    pub parallel: bool,
    /// Title printed at the top of the text summary
    pub title: String,
    /// Name of the continuous series, for the text summary
    pub series_label: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl RunConfig {
    /// Small simulation count for previews and tests.
    pub fn quick() -> Self {
        Self {
            number_of_simulations: 200,
            ..Self::standard()
        }
    }

    /// Default run: 1000 simulations, seed 30188, 95% level.
    pub fn standard() -> Self {
        Self {
            number_of_simulations: DEFAULT_NUMBER_OF_SIMULATIONS,
            seed: DEFAULT_SEED,
            include_incomplete_epochs: false,
            alpha_level: AlphaLevel::P95,
            parallel: true,
            title: "Superposed Epoch Analysis".to_string(),
            series_label: String::new(),
        }
    }

    /// Enough simulations for stable 99.9% percentile tails.
    pub fn thorough() -> Self {
        Self {
            number_of_simulations: 10_000,
            ..Self::standard()
        }
    }

    /// Set the simulation count.
    pub fn with_simulations(mut self, number_of_simulations: usize) -> Self {
        self.number_of_simulations = number_of_simulations;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the incomplete-epoch policy.
    pub fn with_incomplete_epochs(mut self, include: bool) -> Self {
        self.include_incomplete_epochs = include;
        self
    }

    /// Set the alpha level.
    pub fn with_alpha_level(mut self, alpha_level: AlphaLevel) -> Self {
        self.alpha_level = alpha_level;
        self
    }

    /// Enable or disable parallel simulation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fail fast on settings that would make the whole run meaningless.
    pub fn validate(&self) -> EpochResult<()> {
        validate_min_count(self.number_of_simulations, 1, "number_of_simulations")
    }
}
