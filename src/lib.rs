//! liftcast - Goal weight forecasting from workout history
//!
//! Extracts an exercise's weight history from a workout log and projects the
//! day its least-squares trend reaches a goal weight.

pub mod error;
pub mod history;
pub mod ml;
pub mod request;

pub use error::PredictionError;
pub use history::{ExerciseHistory, WorkoutSession, extract_history};
pub use ml::{Forecaster, Prediction, predict_goal_date};
