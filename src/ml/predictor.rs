//! Goal date prediction using a least-squares trend line

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::{PredictionError, Result, MIN_SAMPLES};
use crate::history::{DATE_FORMAT, ExerciseHistory};

/// Covariance below this many ulps per sample counts as no trend
const FLAT_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Linear trend of weight over days elapsed since `start`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    /// Weight gained per day
    pub slope: f64,
    /// Fitted weight on `start`
    pub intercept: f64,
    /// Fit quality (0-1)
    pub r_squared: f64,
    /// Earliest sample date, day zero of the fit
    pub start: NaiveDate,
    pub samples: usize,
}

/// Projected date for reaching a goal weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub goal_weight: f64,
    /// Exact (fractional) offset from `trend.start`
    pub days_from_start: f64,
    pub trend: TrendLine,
}

impl TrendLine {
    /// Fitted weight after `days` elapsed days
    pub fn weight_at(&self, days: f64) -> f64 {
        self.slope * days + self.intercept
    }

    /// Elapsed days at which the trend equals `goal`.
    ///
    /// A flat trend reaches its own level immediately and nothing else ever.
    pub fn days_to_reach(&self, goal: f64) -> Result<f64> {
        if self.slope == 0.0 {
            return if goal == self.intercept {
                Ok(0.0)
            } else {
                Err(PredictionError::UnreachableGoal {
                    goal,
                    level: self.intercept,
                })
            };
        }

        Ok((goal - self.intercept) / self.slope)
    }

    /// Calendar date `days` after `start`, truncated toward the earlier day
    pub fn date_after(&self, days: f64) -> Result<NaiveDate> {
        let whole = days.floor();
        // NaN would cast to zero
        if !whole.is_finite() {
            return Err(PredictionError::OutOfRange { days });
        }

        Duration::try_days(whole as i64)
            .and_then(|offset| self.start.checked_add_signed(offset))
            .ok_or(PredictionError::OutOfRange { days })
    }
}

impl Prediction {
    /// Goal lies behind the start of the history per the fitted trend
    pub fn is_in_past(&self) -> bool {
        self.days_from_start < 0.0
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format(DATE_FORMAT))
    }
}

/// Fit weight against days since the earliest date by ordinary least squares
pub fn fit_trend(dates: &[NaiveDate], weights: &[f64]) -> Result<TrendLine> {
    if dates.len() != weights.len() {
        return Err(PredictionError::LengthMismatch {
            dates: dates.len(),
            weights: weights.len(),
        });
    }
    if dates.len() < MIN_SAMPLES {
        return Err(PredictionError::InsufficientData { found: dates.len() });
    }

    let start = *dates
        .iter()
        .min()
        .ok_or(PredictionError::InsufficientData { found: 0 })?;

    let days: Vec<f64> = dates
        .iter()
        .map(|d| (*d - start).num_days() as f64)
        .collect();

    let n = days.len() as f64;
    let mean_x = days.iter().sum::<f64>() / n;
    let mean_y = weights.iter().sum::<f64>() / n;

    let mut var_x = 0.0;
    let mut cov_xy = 0.0;
    // Sum of |dx * dy|, the scale rounding error in cov_xy is measured against
    let mut cov_scale = 0.0;
    for (x, y) in days.iter().zip(weights) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        var_x += dx * dx;
        cov_xy += dx * dy;
        cov_scale += (dx * dy).abs();
    }

    if var_x == 0.0 {
        return Err(PredictionError::DegenerateInput);
    }

    // An inexact mean leaves rounding residue in cov_xy for a flat series
    let (slope, intercept) = if weights.iter().all(|&w| w == weights[0]) {
        (0.0, weights[0])
    } else if cov_xy.abs() <= cov_scale * n * FLAT_TOLERANCE {
        (0.0, mean_y)
    } else {
        let slope = cov_xy / var_x;
        (slope, mean_y - slope * mean_x)
    };

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in days.iter().zip(weights) {
        let residual = y - (slope * x + intercept);
        ss_res += residual * residual;
        ss_tot += (y - mean_y) * (y - mean_y);
    }
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    debug!(slope, intercept, r_squared, samples = days.len(), "Fitted trend");

    Ok(TrendLine {
        slope,
        intercept,
        r_squared,
        start,
        samples: days.len(),
    })
}

/// Predict the date on which the fitted trend reaches `goal_weight`.
///
/// Past dates and far-future dates are returned as-is; only a flat trend
/// missing the goal has no answer.
pub fn predict_goal_date(
    dates: &[NaiveDate],
    weights: &[f64],
    goal_weight: f64,
) -> Result<Prediction> {
    let trend = fit_trend(dates, weights)?;
    let days_from_start = trend.days_to_reach(goal_weight)?;
    let date = trend.date_after(days_from_start)?;

    debug!(goal_weight, days_from_start, %date, "Predicted goal date");

    Ok(Prediction {
        date,
        goal_weight,
        days_from_start,
        trend,
    })
}

/// Goal prediction straight from an extracted history
pub fn predict_from_history(history: &ExerciseHistory, goal_weight: f64) -> Result<Prediction> {
    predict_goal_date(&history.dates, &history.weights, goal_weight)
}
