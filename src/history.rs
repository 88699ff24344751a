//! Workout log records and per-exercise history extraction

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PredictionError, Result};

/// Calendar date format used by workout logs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One logged workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub date: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

/// Exercise performed within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub label: String,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

/// Single set; weight is unit-less
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRecord {
    pub weight: RawWeight,
}

/// Weight exactly as logged: a number, a numeric-looking string, or junk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawWeight {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawWeight {
    /// Parse into a finite `f64`.
    ///
    /// Strings are trimmed before parsing. NaN and infinities are rejected
    /// whichever form they arrive in.
    pub fn to_f64(&self) -> Result<f64> {
        let parsed = match self {
            RawWeight::Number(n) => Some(*n),
            RawWeight::Text(s) => s.trim().parse::<f64>().ok(),
            RawWeight::Other(_) => None,
        };

        match parsed {
            Some(w) if w.is_finite() => Ok(w),
            _ => Err(PredictionError::MalformedWeight {
                value: self.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RawWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawWeight::Number(n) => write!(f, "{}", n),
            RawWeight::Text(s) => write!(f, "{}", s),
            RawWeight::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for RawWeight {
    fn from(w: f64) -> Self {
        RawWeight::Number(w)
    }
}

impl From<&str> for RawWeight {
    fn from(w: &str) -> Self {
        RawWeight::Text(w.to_string())
    }
}

/// Parse a `YYYY-MM-DD` session date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| PredictionError::MalformedDate {
        value: value.to_string(),
    })
}

/// One (date, weight) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Parallel date/weight sequences for a single exercise
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseHistory {
    pub dates: Vec<NaiveDate>,
    pub weights: Vec<f64>,
}

impl ExerciseHistory {
    pub fn from_samples(samples: impl IntoIterator<Item = Sample>) -> Self {
        let (dates, weights) = samples.into_iter().map(|s| (s.date, s.weight)).unzip();
        Self { dates, weights }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate paired samples in extraction order
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.dates
            .iter()
            .zip(&self.weights)
            .map(|(&date, &weight)| Sample { date, weight })
    }
}

/// Extract every set of `exercise` from the log, in input order.
///
/// Labels match exactly. Every session date is parsed, matching or not, and
/// any bad date or weight aborts the whole extraction.
pub fn extract_history(sessions: &[WorkoutSession], exercise: &str) -> Result<ExerciseHistory> {
    let mut history = ExerciseHistory::default();

    for session in sessions {
        let date = parse_date(&session.date)?;

        let sets = session
            .exercises
            .iter()
            .filter(|e| e.label == exercise)
            .flat_map(|e| &e.sets);

        for set in sets {
            history.dates.push(date);
            history.weights.push(set.weight.to_f64()?);
        }
    }

    debug!(
        exercise,
        sessions = sessions.len(),
        samples = history.len(),
        "Extracted exercise history"
    );

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(date: &str, exercises: Vec<ExerciseEntry>) -> WorkoutSession {
        WorkoutSession {
            date: date.to_string(),
            exercises,
        }
    }

    fn entry(label: &str, weights: &[f64]) -> ExerciseEntry {
        ExerciseEntry {
            label: label.to_string(),
            sets: weights
                .iter()
                .map(|&w| SetRecord { weight: w.into() })
                .collect(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_extract_matching_sets() {
        let log = vec![
            session("2023-01-01", vec![entry("Bench Press", &[50.0, 55.0])]),
            session("2023-01-15", vec![entry("Bench Press", &[60.0])]),
            session("2023-02-01", vec![entry("Bench Press", &[65.0])]),
        ];

        let history = extract_history(&log, "Bench Press").unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(
            history.dates,
            vec![
                date("2023-01-01"),
                date("2023-01-01"),
                date("2023-01-15"),
                date("2023-02-01"),
            ]
        );
        assert_eq!(history.weights, vec![50.0, 55.0, 60.0, 65.0]);
    }

    #[test]
    fn test_extract_skips_other_exercises() {
        let log = vec![session(
            "2023-01-01",
            vec![entry("Squat", &[100.0, 110.0]), entry("Bench Press", &[50.0])],
        )];

        let history = extract_history(&log, "Bench Press").unwrap();
        assert_eq!(history.weights, vec![50.0]);
    }

    #[test]
    fn test_extract_label_case_sensitive() {
        let log = vec![session("2023-01-01", vec![entry("bench press", &[50.0])])];
        let history = extract_history(&log, "Bench Press").unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_extract_keeps_input_order() {
        // Sessions out of chronological order stay out of order
        let log = vec![
            session("2023-02-01", vec![entry("Deadlift", &[140.0])]),
            session("2023-01-01", vec![entry("Deadlift", &[120.0, 125.0])]),
        ];

        let history = extract_history(&log, "Deadlift").unwrap();
        assert_eq!(history.dates[0], date("2023-02-01"));
        assert_eq!(history.weights, vec![140.0, 120.0, 125.0]);
    }

    #[test]
    fn test_extract_no_match_is_empty() {
        let log = vec![session("2023-01-01", vec![entry("Squat", &[100.0])])];
        let history = extract_history(&log, "Bench Press").unwrap();
        assert_eq!(history, ExerciseHistory::default());
    }

    #[test]
    fn test_extract_session_without_exercises() {
        let log = vec![
            session("2023-01-01", vec![]),
            session("2023-01-02", vec![entry("Row", &[])]),
        ];
        let history = extract_history(&log, "Row").unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_extract_malformed_date() {
        let log = vec![
            session("2023-01-01", vec![entry("Bench Press", &[50.0])]),
            session("01/15/2023", vec![entry("Bench Press", &[60.0])]),
        ];

        let err = extract_history(&log, "Bench Press").unwrap_err();
        assert_eq!(
            err,
            PredictionError::MalformedDate {
                value: "01/15/2023".to_string()
            }
        );
    }

    #[test]
    fn test_extract_rejects_date_of_unrelated_session() {
        let log = vec![
            session("garbage", vec![entry("Squat", &[100.0])]),
            session("2023-01-01", vec![entry("Bench Press", &[50.0])]),
        ];
        let err = extract_history(&log, "Bench Press").unwrap_err();
        assert_eq!(
            err,
            PredictionError::MalformedDate {
                value: "garbage".to_string()
            }
        );
    }

    #[test]
    fn test_extract_rejects_date_of_empty_session() {
        let log = vec![
            session("2023-01-01", vec![entry("Bench Press", &[50.0])]),
            session("2023/01/08", vec![]),
        ];
        let err = extract_history(&log, "Bench Press").unwrap_err();
        assert!(matches!(err, PredictionError::MalformedDate { .. }));
    }

    #[test]
    fn test_extract_malformed_weight() {
        let log = vec![session(
            "2023-01-01",
            vec![ExerciseEntry {
                label: "Bench Press".to_string(),
                sets: vec![
                    SetRecord { weight: 50.0.into() },
                    SetRecord { weight: "heavy".into() },
                ],
            }],
        )];

        let err = extract_history(&log, "Bench Press").unwrap_err();
        assert!(matches!(err, PredictionError::MalformedWeight { .. }));
    }

    #[test]
    fn test_weight_parse_forms() {
        assert_eq!(RawWeight::Number(42.5).to_f64().unwrap(), 42.5);
        assert_eq!(RawWeight::from(" 60 ").to_f64().unwrap(), 60.0);
        assert_eq!(RawWeight::from("62.5").to_f64().unwrap(), 62.5);
        assert!(RawWeight::from("").to_f64().is_err());
        assert!(RawWeight::from("NaN").to_f64().is_err());
        assert!(RawWeight::from("inf").to_f64().is_err());
        assert!(RawWeight::Other(serde_json::Value::Null).to_f64().is_err());
    }

    #[test]
    fn test_weight_deserialize_forms() {
        let sets: Vec<SetRecord> =
            serde_json::from_str(r#"[{"weight": 50}, {"weight": "55.5"}, {"weight": null}]"#)
                .unwrap();
        assert_eq!(sets[0].weight, RawWeight::Number(50.0));
        assert_eq!(sets[1].weight, RawWeight::Text("55.5".to_string()));
        assert_eq!(sets[2].weight, RawWeight::Other(serde_json::Value::Null));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2023-03-07").unwrap(), date("2023-03-07"));
        assert!(parse_date("2023-13-01").is_err());
        assert!(parse_date("2023-01-01T10:00:00").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_from_samples_roundtrip() {
        let samples = vec![
            Sample { date: date("2023-01-01"), weight: 50.0 },
            Sample { date: date("2023-01-08"), weight: 52.5 },
        ];
        let history = ExerciseHistory::from_samples(samples.clone());
        assert_eq!(history.samples().collect::<Vec<_>>(), samples);
    }
}
