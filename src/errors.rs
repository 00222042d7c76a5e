//! Error types and validation functions for superposed epoch analysis.
//!
//! Only conditions that invalidate a whole run are errors. A segment that
//! lacks events is not an error: it is reported through
//! [`SegmentStatus`](crate::results::SegmentStatus) and the run continues.

use thiserror::Error;

/// Error types for epoch analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EpochAnalysisError {
    /// Invalid parameter value in the run configuration or window spec.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// The continuous series could not be constructed.
    #[error("Invalid time series: {reason}")]
    InvalidSeries {
        /// Detailed reason
        reason: String,
    },

    /// A synthetic window position fell outside the series.
    ///
    /// The simulator's sampling ranges make this unreachable; seeing it means
    /// the validity mask was applied to years it was not built for.
    #[error("Window position {year} lies outside the time series")]
    WindowOutOfSeries {
        /// Year that had no series value
        year: i32,
    },

    /// The caller requested cancellation between segments.
    #[error("Analysis cancelled before segment {segment_index}")]
    Cancelled {
        /// Index of the first segment that was not processed
        segment_index: usize,
    },
}

/// Result type for epoch analysis operations.
pub type EpochResult<T> = Result<T, EpochAnalysisError>;

/// Validates that a count is at least `min`.
///
/// # Example
/// ```rust
/// use superposed_epoch::errors::validate_min_count;
///
/// assert!(validate_min_count(1000, 1, "number_of_simulations").is_ok());
/// assert!(validate_min_count(0, 1, "number_of_simulations").is_err());
/// ```
pub fn validate_min_count(value: usize, min: usize, name: &str) -> EpochResult<()> {
    if value < min {
        Err(EpochAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value: value as f64,
            constraint: format!("must be at least {}", min),
        })
    } else {
        Ok(())
    }
}

/// Validates that a signed year offset is non-negative.
///
/// # Example
/// ```rust
/// use superposed_epoch::errors::validate_non_negative;
///
/// assert!(validate_non_negative(0, "prior_years").is_ok());
/// assert!(validate_non_negative(-1, "prior_years").is_err());
/// ```
pub fn validate_non_negative(value: i32, name: &str) -> EpochResult<()> {
    if value < 0 {
        Err(EpochAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value: value as f64,
            constraint: "must be non-negative".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns immediately on the first non-finite value.
pub fn validate_all_finite(data: &[f64], name: &str) -> EpochResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(EpochAnalysisError::InvalidSeries {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
        });
    }

    Ok(())
}
