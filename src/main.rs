//! liftcast - Goal weight forecasting from workout history

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use liftcast::history::{ExerciseEntry, SetRecord, WorkoutSession};
use liftcast::ml::Forecaster;
use liftcast::request;

#[derive(Parser)]
#[command(name = "liftcast")]
#[command(author, version, about = "Projects when you will lift a goal weight")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the goal date for a JSON request
    Predict {
        /// Request file (stdin when omitted)
        #[arg(short, long, env = "LIFTCAST_INPUT")]
        input: Option<PathBuf>,

        /// Pretty-print the response
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show the extracted weight history for an exercise
    History {
        /// Exercise label, matched exactly (e.g., "Bench Press")
        exercise: String,

        /// Workout log or request file (stdin when omitted)
        #[arg(short, long, env = "LIFTCAST_INPUT")]
        input: Option<PathBuf>,
    },

    /// Run the built-in sample log
    Demo,
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;
            Ok(body)
        }
    }
}

fn sample_log() -> Vec<WorkoutSession> {
    let session = |date: &str, weights: &[f64]| WorkoutSession {
        date: date.to_string(),
        exercises: vec![ExerciseEntry {
            label: "Bench Press".to_string(),
            sets: weights
                .iter()
                .map(|&w| SetRecord { weight: w.into() })
                .collect(),
        }],
    };

    vec![
        session("2023-01-01", &[50.0, 55.0]),
        session("2023-01-15", &[60.0]),
        session("2023-02-01", &[65.0]),
    ]
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Predict { input, pretty }) => {
            let body = read_input(input.as_deref())?;
            let response = request::handle_json(&body);

            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", json);

            if !response.is_success() {
                bail!("Prediction failed with status {}", response.status_code);
            }
        }

        Some(Commands::History { exercise, input }) => {
            let body = read_input(input.as_deref())?;
            let sessions =
                request::parse_workout_log(&body).context("Invalid workout log")?;

            let forecaster = Forecaster::new(sessions);
            let history = forecaster.history(&exercise)?;

            println!("History for {}: {} sets", exercise, history.len());
            println!("{:-<30}", "");
            for sample in history.samples() {
                println!("{} | {:>8.1}", sample.date, sample.weight);
            }
        }

        Some(Commands::Demo) | None => {
            let goal_weight = 80.0;
            let forecaster = Forecaster::new(sample_log());
            let prediction = forecaster.predict("Bench Press", goal_weight)?;

            println!("Predicted date to reach {}kg: {}", goal_weight, prediction);
            println!(
                "Trend: {:+.2} kg/day (R2 {:.2}, {} sets)",
                prediction.trend.slope, prediction.trend.r_squared, prediction.trend.samples
            );
        }
    }

    Ok(())
}
