use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PredictionConfig;
use crate::phase::CyclePhase;

/// Where a record came from. Metadata only; the engine ignores it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Grouped from platform health flow samples.
    Platform,
    #[default]
    Manual,
    Imported,
}

/// One observed or logged menstrual cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub period_start_date: NaiveDate,
    #[serde(default)]
    pub period_end_date: Option<NaiveDate>,
    /// Days from the previous record's start to this one's.
    #[serde(default)]
    pub cycle_length: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: DataSource,
}

impl CycleRecord {
    pub fn new(period_start_date: NaiveDate, source: DataSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            period_start_date,
            period_end_date: None,
            cycle_length: None,
            notes: None,
            source,
        }
    }

    /// Length of the logged period in days, if the record has a usable end date.
    pub fn period_length(&self) -> Option<u32> {
        let end = self.period_end_date?;
        u32::try_from((end - self.period_start_date).num_days()).ok()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowLevel {
    None,
    Light,
    Medium,
    Heavy,
}

/// A single day of menstrual flow as reported by a health platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowSample {
    pub date: NaiveDate,
    pub flow_level: FlowLevel,
}

/// Forward-looking prediction built from the record history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CyclePrediction {
    pub next_period_start: NaiveDate,
    pub pms_window_start: NaiveDate,
    pub pms_window_end: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub current_phase: CyclePhase,
    pub days_until_next_period: u32,
    pub days_until_pms: u32,
    pub average_cycle_length: u32,
}

impl CyclePrediction {
    /// Days elapsed since `pms_window_end`, only while menstruating.
    pub fn days_into_period(&self, reference_date: NaiveDate) -> Option<i64> {
        if self.current_phase != CyclePhase::Menstruation {
            return None;
        }
        Some((reference_date - self.pms_window_end).num_days())
    }
}

/// Summary figures for the stats view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleSummary {
    pub total_cycles: usize,
    pub avg_cycle_length: Option<f32>,
    pub avg_period_length: Option<f32>,
    pub shortest_cycle: Option<u32>,
    pub longest_cycle: Option<u32>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub records: Vec<CycleRecord>,
    #[serde(default)]
    pub settings: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub reminders: ReminderSettings,
    /// How far back flow imports reach.
    #[serde(default = "default_history_months")]
    pub history_months: u32,
}

fn default_history_months() -> u32 {
    12
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            prediction: PredictionConfig::default(),
            reminders: ReminderSettings::default(),
            history_months: default_history_months(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReminderSettings {
    pub enabled: bool,
    /// Local hour (0-23) reminders fire at.
    pub hour: u32,
    pub pms_lead_days: u32,
    pub period_lead_days: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: 9,
            pms_lead_days: 2,
            period_lead_days: 1,
        }
    }
}
