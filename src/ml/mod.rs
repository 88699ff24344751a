//! ML module - Goal date forecasting
//!
//! Fits a least-squares trend to an exercise's weight history and solves it
//! for the day a goal weight is reached.

pub mod predictor;

pub use predictor::{Prediction, TrendLine, fit_trend, predict_from_history, predict_goal_date};

use crate::error::Result;
use crate::history::{ExerciseHistory, WorkoutSession, extract_history};

/// Forecasts over a workout log
pub struct Forecaster {
    sessions: Vec<WorkoutSession>,
}

impl Forecaster {
    pub fn new(sessions: Vec<WorkoutSession>) -> Self {
        Self { sessions }
    }

    /// Weight history for one exercise
    pub fn history(&self, exercise: &str) -> Result<ExerciseHistory> {
        extract_history(&self.sessions, exercise)
    }

    /// Fitted trend for one exercise
    pub fn trend(&self, exercise: &str) -> Result<TrendLine> {
        let history = self.history(exercise)?;
        fit_trend(&history.dates, &history.weights)
    }

    /// Date on which `exercise` is projected to reach `goal_weight`
    pub fn predict(&self, exercise: &str, goal_weight: f64) -> Result<Prediction> {
        let history = self.history(exercise)?;
        predict_from_history(&history, goal_weight)
    }
}
