//! JSON request/response envelope for the prediction service

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PredictionError;
use crate::history::{WorkoutSession, extract_history};
use crate::ml::predict_from_history;

/// Message returned when the exercise never appears in the log
pub const NO_DATA_MESSAGE: &str = "No data found for the specified exercise.";

/// Incoming prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub exercise: String,
    pub goal_weight: f64,
    #[serde(default)]
    pub workout_history: Vec<WorkoutSession>,
}

/// Workout log as sent on its own or wrapped in a request
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkoutLog {
    Sessions(Vec<WorkoutSession>),
    #[serde(rename_all = "camelCase")]
    Wrapped { workout_history: Vec<WorkoutSession> },
}

/// Parse a workout log from either a bare session array or any object with
/// a `workoutHistory` field; other request fields are not required
pub fn parse_workout_log(body: &str) -> serde_json::Result<Vec<WorkoutSession>> {
    Ok(match serde_json::from_str::<WorkoutLog>(body)? {
        WorkoutLog::Sessions(sessions) => sessions,
        WorkoutLog::Wrapped { workout_history } => workout_history,
    })
}

/// Response body: a date on success, an error message otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    #[serde(rename_all = "camelCase")]
    Predicted { predicted_date: String },
    Failed { error: String },
}

/// Status code plus body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl PredictionResponse {
    fn predicted(date: String) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Predicted { predicted_date: date },
        }
    }

    fn failed(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody::Failed { error: error.into() },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Status code for a failed request.
///
/// Unparseable input is a bad request; well-formed data that admits no
/// forecast is unprocessable.
pub fn status_for(error: &PredictionError) -> u16 {
    match error {
        PredictionError::MalformedDate { .. }
        | PredictionError::MalformedWeight { .. }
        | PredictionError::LengthMismatch { .. } => 400,
        PredictionError::InsufficientData { .. }
        | PredictionError::DegenerateInput
        | PredictionError::UnreachableGoal { .. }
        | PredictionError::OutOfRange { .. } => 422,
    }
}

/// Run extraction and prediction for one request
pub fn handle(request: &PredictionRequest) -> PredictionResponse {
    let history = match extract_history(&request.workout_history, &request.exercise) {
        Ok(history) => history,
        Err(e) => {
            warn!(exercise = %request.exercise, error = %e, "Rejected workout history");
            return PredictionResponse::failed(status_for(&e), e.to_string());
        }
    };

    if history.is_empty() {
        return PredictionResponse::failed(400, NO_DATA_MESSAGE);
    }

    match predict_from_history(&history, request.goal_weight) {
        Ok(prediction) => {
            info!(
                exercise = %request.exercise,
                goal_weight = request.goal_weight,
                date = %prediction,
                "Goal date predicted"
            );
            PredictionResponse::predicted(prediction.to_string())
        }
        Err(e) => {
            warn!(exercise = %request.exercise, error = %e, "Prediction failed");
            PredictionResponse::failed(status_for(&e), e.to_string())
        }
    }
}

/// Parse a JSON request body and handle it
pub fn handle_json(body: &str) -> PredictionResponse {
    match serde_json::from_str::<PredictionRequest>(body) {
        Ok(request) => handle(&request),
        Err(e) => PredictionResponse::failed(400, format!("Invalid request body: {}", e)),
    }
}
