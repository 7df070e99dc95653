//! Private, on-device menstrual cycle prediction.
//!
//! The engine is a set of pure functions over an ascending list of
//! [`CycleRecord`]s: [`stats`] reduces the history to average lengths,
//! [`phase`] classifies a date into a [`CyclePhase`], and
//! [`prediction::predict`] combines the two into a [`CyclePrediction`].
//! Storage, tips, reminders and the command layer sit around it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod history;
pub mod logging;
pub mod models;
pub mod phase;
pub mod prediction;
pub mod reminders;
pub mod stats;
pub mod storage;
pub mod tips;

#[cfg(test)]
mod properties;

pub use config::PredictionConfig;
pub use models::{CyclePrediction, CycleRecord, DataSource};
pub use phase::CyclePhase;
pub use prediction::{predict, predict_with};
