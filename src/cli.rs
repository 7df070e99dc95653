//! Command-line front end over [`AppState`].

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::commands::{AppState, CommandError};
use crate::logging::LogFormat;
use crate::models::{CyclePrediction, CycleRecord, FlowSample};
use crate::phase::{self, PhaseMetadata};
use crate::storage::EncryptedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CliLogFormat {
    #[default]
    Text,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(fmt: CliLogFormat) -> Self {
        match fmt {
            CliLogFormat::Text => LogFormat::Text,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

/// cyclecast - private, on-device cycle predictions.
#[derive(Debug, Parser)]
#[command(name = "cyclecast", version, about)]
pub struct Cli {
    /// Encrypted data file (defaults to the local data directory)
    #[arg(long = "data-file", env = "CYCLECAST_DATA_FILE", global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Passphrase protecting the data file
    #[arg(long, env = "CYCLECAST_PASSPHRASE", hide_env_values = true, global = true)]
    pub passphrase: Option<String>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(long = "log-format", value_enum, default_value_t = CliLogFormat::Text, global = true)]
    pub log_format: CliLogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new, empty data file
    Init,
    /// Log a period manually
    Log {
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: NaiveDate,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end: Option<NaiveDate>,
        /// Self-reported cycle length in days
        #[arg(long = "cycle-length")]
        cycle_length: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Import a JSON array of cycle records
    Import { file: PathBuf },
    /// Import a JSON array of daily flow samples exported from a health platform
    ImportFlow { file: PathBuf },
    /// Predict the next period and classify the current phase
    Predict {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// Show cycle statistics
    Stats,
    /// Show the tip of the day for the current phase
    Tip {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// List the reminders that should be scheduled
    Reminders,
    /// Print all data as JSON
    Export,
    /// Permanently delete the data file
    Wipe {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Serialize)]
struct PredictionView {
    #[serde(flatten)]
    prediction: CyclePrediction,
    phase: PhaseMetadata,
    days_into_period: Option<i64>,
}

const NO_PREDICTION: &str =
    "Not enough data for a prediction yet. Log your last period start to get started.";

pub fn run(cli: Cli) -> Result<(), CommandError> {
    let store = match cli.data_file {
        Some(path) => EncryptedStore::new(path),
        None => EncryptedStore::at_default_location()?,
    };
    let passphrase = cli
        .passphrase
        .ok_or_else(|| CommandError::InvalidInput("no passphrase given (set CYCLECAST_PASSPHRASE)".into()))?;
    run_command(&AppState::new(store), cli.command, passphrase)
}

/// Execute one command, then lock the state whether or not it succeeded.
fn run_command(state: &AppState, command: Command, passphrase: String) -> Result<(), CommandError> {
    let result = execute(state, command, passphrase);
    state.lock();
    result
}

fn execute(state: &AppState, command: Command, passphrase: String) -> Result<(), CommandError> {
    if let Command::Init = command {
        state.setup(passphrase)?;
        println!("Data file created.");
        return Ok(());
    }

    if !state.is_setup() {
        return Err(CommandError::InvalidInput(
            "no data file yet; run `cyclecast init` first".into(),
        ));
    }
    if !state.unlock(passphrase)? {
        return Err(CommandError::InvalidInput("wrong passphrase".into()));
    }

    let today = chrono::Local::now().date_naive();
    match command {
        Command::Init => Ok(()),
        Command::Log {
            start,
            end,
            cycle_length,
            notes,
        } => {
            let record = state.log_period(start, end, cycle_length, notes)?;
            print_json(&record)
        }
        Command::Import { file } => {
            let records: Vec<CycleRecord> = read_json(&file)?;
            let count = state.import_records(records)?;
            println!("Imported {count} records.");
            Ok(())
        }
        Command::ImportFlow { file } => {
            let samples: Vec<FlowSample> = read_json(&file)?;
            let count = state.import_flow(&samples, today)?;
            println!("Found {count} periods.");
            Ok(())
        }
        Command::Predict { date } => {
            let reference = date.unwrap_or(today);
            match state.get_prediction(reference)? {
                Some(prediction) => print_json(&PredictionView {
                    phase: phase::metadata(prediction.current_phase),
                    days_into_period: prediction.days_into_period(reference),
                    prediction,
                }),
                None => {
                    println!("{NO_PREDICTION}");
                    Ok(())
                }
            }
        }
        Command::Stats => print_json(&state.get_stats()?),
        Command::Tip { date } => match state.get_tip(date.unwrap_or(today))? {
            Some(tip) => print_json(&tip),
            None => {
                println!("{NO_PREDICTION}");
                Ok(())
            }
        },
        Command::Reminders => print_json(&state.get_reminders(chrono::Local::now().naive_local())?),
        Command::Export => {
            println!("{}", state.export_data()?);
            Ok(())
        }
        Command::Wipe { yes: false } => Err(CommandError::InvalidInput(
            "pass --yes to delete all data".into(),
        )),
        Command::Wipe { yes: true } => {
            state.wipe_all_data()?;
            println!("All data deleted.");
            Ok(())
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CommandError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CommandError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&text)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
