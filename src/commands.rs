use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use zeroize::Zeroize;

use crate::crypto::CryptoError;
use crate::history::{self, CycleSource};
use crate::models::*;
use crate::prediction;
use crate::reminders::{self, Reminder};
use crate::stats;
use crate::storage::{EncryptedStore, StorageError};
use crate::tips::{self, Tip};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("app is locked")]
    Locked,
    #[error("tracker is already set up")]
    AlreadySetUp,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("state lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Holds the passphrase and decrypted data while unlocked.
pub struct AppState {
    store: EncryptedStore,
    passphrase: Mutex<Option<String>>,
    data: Mutex<Option<AppData>>,
}

impl AppState {
    pub fn new(store: EncryptedStore) -> Self {
        Self {
            store,
            passphrase: Mutex::new(None),
            data: Mutex::new(None),
        }
    }

    pub fn is_setup(&self) -> bool {
        self.store.exists()
    }

    /// Create an empty data file and unlock it.
    pub fn setup(&self, passphrase: String) -> Result<(), CommandError> {
        if self.store.exists() {
            return Err(CommandError::AlreadySetUp);
        }
        let data = AppData::default();
        self.store.save(&passphrase, &data)?;

        *self.passphrase.lock().map_err(|_| CommandError::Poisoned)? = Some(passphrase);
        *self.data.lock().map_err(|_| CommandError::Poisoned)? = Some(data);
        Ok(())
    }

    /// Returns `false` on a wrong passphrase.
    pub fn unlock(&self, passphrase: String) -> Result<bool, CommandError> {
        match self.store.load(&passphrase) {
            Ok(data) => {
                *self.passphrase.lock().map_err(|_| CommandError::Poisoned)? = Some(passphrase);
                *self.data.lock().map_err(|_| CommandError::Poisoned)? = Some(data);
                Ok(true)
            }
            Err(StorageError::Crypto(CryptoError::Decryption)) => {
                tracing::warn!("unlock failed: wrong passphrase");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Zeroize the passphrase and drop data from memory.
    pub fn lock(&self) {
        if let Ok(mut pass) = self.passphrase.lock() {
            if let Some(ref mut p) = *pass {
                p.zeroize();
            }
            *pass = None;
        }
        if let Ok(mut data) = self.data.lock() {
            *data = None;
        }
    }

    /// Record a manually entered period.
    pub fn log_period(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
        cycle_length: Option<u32>,
        notes: Option<String>,
    ) -> Result<CycleRecord, CommandError> {
        if let Some(end) = end.filter(|end| *end < start) {
            return Err(CommandError::InvalidInput(format!(
                "period end {end} is before start {start}"
            )));
        }
        if cycle_length == Some(0) {
            return Err(CommandError::InvalidInput("cycle length must be positive".into()));
        }

        let mut record = CycleRecord::new(start, DataSource::Manual);
        record.period_end_date = end;
        record.cycle_length = cycle_length;
        record.notes = notes;

        self.write(|data| {
            data.records.push(record.clone());
            sort_records(data);
        })?;
        tracing::info!(start = %record.period_start_date, "logged period");
        Ok(record)
    }

    /// Add records from an export or another tracker. Returns how many were added.
    pub fn import_records(&self, records: Vec<CycleRecord>) -> Result<usize, CommandError> {
        let count = records.len();
        self.write(|data| {
            data.records
                .extend(records.into_iter().map(|r| CycleRecord {
                    source: DataSource::Imported,
                    ..r
                }));
            sort_records(data);
        })?;
        tracing::info!(count, "imported records");
        Ok(count)
    }

    /// Replace platform-sourced records with ones regrouped from flow samples.
    /// Returns the number of periods found.
    pub fn import_flow(&self, samples: &[FlowSample], today: NaiveDate) -> Result<usize, CommandError> {
        let count = self.write(|data| {
            let recent = history::within_months(samples, data.settings.history_months, today);
            let grouped = history::group_flow_samples(&recent);
            let count = grouped.len();
            data.records.retain(|r| r.source != DataSource::Platform);
            data.records.extend(grouped);
            sort_records(data);
            count
        })?;
        tracing::info!(periods = count, "imported flow samples");
        Ok(count)
    }

    /// `Ok(None)` means there is not enough data yet.
    pub fn get_prediction(&self, reference: NaiveDate) -> Result<Option<CyclePrediction>, CommandError> {
        self.read(|data| predict_for(data, reference))
    }

    pub fn get_stats(&self) -> Result<CycleSummary, CommandError> {
        self.read(|data| stats::cycle_summary(&history_of(data)))
    }

    pub fn get_tip(&self, reference: NaiveDate) -> Result<Option<Tip>, CommandError> {
        self.read(|data| {
            predict_for(data, reference).map(|p| tips::tip_of_the_day(p.current_phase, reference))
        })
    }

    pub fn get_reminders(&self, now: NaiveDateTime) -> Result<Vec<Reminder>, CommandError> {
        self.read(|data| match predict_for(data, now.date()) {
            Some(prediction) => reminders::plan_reminders(&prediction, &data.settings.reminders, now),
            None => Vec::new(),
        })
    }

    pub fn get_settings(&self) -> Result<AppSettings, CommandError> {
        self.read(|data| data.settings.clone())
    }

    pub fn update_settings(&self, mut settings: AppSettings) -> Result<(), CommandError> {
        settings.reminders.hour = settings.reminders.hour.min(23);
        settings.history_months = settings.history_months.clamp(1, 120);
        self.write(|data| data.settings = settings)
    }

    pub fn export_data(&self) -> Result<String, CommandError> {
        let data_lock = self.data.lock().map_err(|_| CommandError::Poisoned)?;
        let data = data_lock.as_ref().ok_or(CommandError::Locked)?;
        Ok(serde_json::to_string_pretty(data)?)
    }

    pub fn wipe_all_data(&self) -> Result<(), CommandError> {
        self.lock();
        self.store.wipe()?;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&AppData) -> T) -> Result<T, CommandError> {
        let data_lock = self.data.lock().map_err(|_| CommandError::Poisoned)?;
        let data = data_lock.as_ref().ok_or(CommandError::Locked)?;
        Ok(f(data))
    }

    /// Apply `f` to a copy of the unlocked data; the copy replaces the
    /// in-memory data only once it has been saved.
    fn write<T>(&self, f: impl FnOnce(&mut AppData) -> T) -> Result<T, CommandError> {
        let pass = self.passphrase.lock().map_err(|_| CommandError::Poisoned)?;
        let mut data_lock = self.data.lock().map_err(|_| CommandError::Poisoned)?;
        let (Some(passphrase), Some(data)) = (pass.as_ref(), data_lock.as_mut()) else {
            return Err(CommandError::Locked);
        };
        let mut staged = data.clone();
        let out = f(&mut staged);
        self.store.save(passphrase, &staged)?;
        *data = staged;
        Ok(out)
    }
}

fn sort_records(data: &mut AppData) {
    data.records = history::normalize(std::mem::take(&mut data.records));
}

fn history_of(data: &AppData) -> Vec<CycleRecord> {
    data.fetch_historical_cycles().unwrap_or_else(|never| match never {})
}

fn predict_for(data: &AppData, reference: NaiveDate) -> Option<CyclePrediction> {
    prediction::predict_with(&history_of(data), reference, &data.settings.prediction)
}
