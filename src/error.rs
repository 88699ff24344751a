//! Error types for extraction and prediction

use thiserror::Error;

/// Minimum number of samples needed to fit a trend line
pub const MIN_SAMPLES: usize = 2;

/// Failures surfaced by the extractor and the predictor.
///
/// Every variant is fatal to a single prediction request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Malformed date '{value}': expected YYYY-MM-DD")]
    MalformedDate { value: String },

    #[error("Malformed weight '{value}': expected a finite number")]
    MalformedWeight { value: String },

    #[error("Insufficient data: need at least {min} samples, got {found}", min = MIN_SAMPLES)]
    InsufficientData { found: usize },

    #[error("Cannot fit a trend: all samples fall on the same day")]
    DegenerateInput,

    #[error("Goal {goal} is unreachable: trend is flat at {level}")]
    UnreachableGoal { goal: f64, level: f64 },

    #[error("Got {dates} dates but {weights} weights")]
    LengthMismatch { dates: usize, weights: usize },

    #[error("Predicted offset of {days} days is outside the calendar range")]
    OutOfRange { days: f64 },
}

pub type Result<T> = std::result::Result<T, PredictionError>;
