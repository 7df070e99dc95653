//! Preparing cycle history for the prediction engine.
//!
//! The engine trusts its input to be sorted ascending; everything that hands
//! records to it goes through [`normalize`] or [`select_history`] first.

use std::convert::Infallible;

use chrono::{Months, NaiveDate};

use crate::models::{AppData, CycleRecord, DataSource, FlowLevel, FlowSample};

/// Flow days further apart than this start a new period.
const MAX_FLOW_GAP_DAYS: i64 = 2;

/// Anything that can supply the historical cycle collection.
pub trait CycleSource {
    type Error;

    /// Records ordered ascending by start date. May be empty.
    fn fetch_historical_cycles(&self) -> Result<Vec<CycleRecord>, Self::Error>;
}

impl CycleSource for AppData {
    type Error = Infallible;

    fn fetch_historical_cycles(&self) -> Result<Vec<CycleRecord>, Infallible> {
        Ok(select_history(&self.records))
    }
}

/// Sort ascending by period start. Stable, so same-day records keep their order.
pub fn normalize(mut records: Vec<CycleRecord>) -> Vec<CycleRecord> {
    records.sort_by_key(|r| r.period_start_date);
    records
}

/// Platform-sourced records win when there are any; otherwise fall back to
/// the locally logged ones.
pub fn select_history(records: &[CycleRecord]) -> Vec<CycleRecord> {
    let (platform, local): (Vec<CycleRecord>, Vec<CycleRecord>) = records
        .iter()
        .cloned()
        .partition(|r| r.source == DataSource::Platform);

    if platform.is_empty() {
        normalize(local)
    } else {
        normalize(platform)
    }
}

/// Keep samples dated within `months` before `today`.
pub fn within_months(samples: &[FlowSample], months: u32, today: NaiveDate) -> Vec<FlowSample> {
    let Some(cutoff) = today.checked_sub_months(Months::new(months)) else {
        return samples.to_vec();
    };
    samples.iter().filter(|s| s.date >= cutoff).cloned().collect()
}

/// Group day-level flow samples into period records.
///
/// Days without flow are ignored. Every record after the first gets the
/// distance from the previous record's start as its cycle length.
pub fn group_flow_samples(samples: &[FlowSample]) -> Vec<CycleRecord> {
    let mut flow_days: Vec<NaiveDate> = samples
        .iter()
        .filter(|s| s.flow_level != FlowLevel::None)
        .map(|s| s.date)
        .collect();
    flow_days.sort();
    flow_days.dedup();

    let Some((&first, rest)) = flow_days.split_first() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    let mut period_start = first;
    let mut period_end = first;

    for &day in rest {
        if (day - period_end).num_days() > MAX_FLOW_GAP_DAYS {
            records.push(platform_record(period_start, period_end));
            period_start = day;
        }
        period_end = day;
    }
    records.push(platform_record(period_start, period_end));

    let starts: Vec<NaiveDate> = records.iter().map(|r| r.period_start_date).collect();
    for (record, previous) in records.iter_mut().skip(1).zip(starts) {
        record.cycle_length = u32::try_from((record.period_start_date - previous).num_days()).ok();
    }

    tracing::debug!(
        samples = samples.len(),
        periods = records.len(),
        "grouped flow samples"
    );
    records
}

fn platform_record(start: NaiveDate, end: NaiveDate) -> CycleRecord {
    let mut record = CycleRecord::new(start, DataSource::Platform);
    record.period_end_date = Some(end);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample(d: &str, flow_level: FlowLevel) -> FlowSample {
        FlowSample {
            date: date(d),
            flow_level,
        }
    }

    fn flow_run(start: &str, days: u64) -> Vec<FlowSample> {
        let start = date(start);
        (0..days)
            .map(|i| FlowSample {
                date: start + chrono::Days::new(i),
                flow_level: FlowLevel::Medium,
            })
            .collect()
    }

    #[test]
    fn groups_runs_into_periods() {
        let mut samples = flow_run("2024-01-01", 5);
        samples.extend(flow_run("2024-01-29", 4));
        samples.extend(flow_run("2024-02-27", 5));

        let records = group_flow_samples(&samples);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].period_start_date, date("2024-01-01"));
        assert_eq!(records[0].period_end_date, Some(date("2024-01-05")));
        assert_eq!(records[0].cycle_length, None);
        assert_eq!(records[1].cycle_length, Some(28));
        assert_eq!(records[2].cycle_length, Some(29));
        assert!(records.iter().all(|r| r.source == DataSource::Platform));
    }

    #[test]
    fn short_gaps_stay_in_one_period() {
        let samples = vec![
            sample("2024-01-01", FlowLevel::Heavy),
            sample("2024-01-03", FlowLevel::Light),
            sample("2024-01-05", FlowLevel::Light),
        ];
        let records = group_flow_samples(&samples);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].period_end_date, Some(date("2024-01-05")));
    }

    #[test]
    fn no_flow_days_are_ignored() {
        let samples = vec![
            sample("2024-01-01", FlowLevel::None),
            sample("2024-01-02", FlowLevel::None),
        ];
        assert!(group_flow_samples(&samples).is_empty());
        assert!(group_flow_samples(&[]).is_empty());
    }

    #[test]
    fn unsorted_samples_are_grouped_by_date() {
        let samples = vec![
            sample("2024-01-30", FlowLevel::Medium),
            sample("2024-01-01", FlowLevel::Medium),
            sample("2024-01-02", FlowLevel::Medium),
            sample("2024-01-29", FlowLevel::Medium),
        ];
        let records = group_flow_samples(&samples);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].period_start_date, date("2024-01-29"));
        assert_eq!(records[1].cycle_length, Some(28));
    }

    #[test]
    fn platform_records_take_priority() {
        let manual = CycleRecord::new(date("2024-03-01"), DataSource::Manual);
        let mut platform = group_flow_samples(&flow_run("2024-02-01", 4));
        platform.push(manual);

        let history = select_history(&platform);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].source, DataSource::Platform);
    }

    #[test]
    fn local_records_are_sorted_on_fallback() {
        let records = vec![
            CycleRecord::new(date("2024-03-01"), DataSource::Manual),
            CycleRecord::new(date("2024-01-01"), DataSource::Imported),
        ];
        let history = select_history(&records);
        assert_eq!(history[0].period_start_date, date("2024-01-01"));
        assert_eq!(history[1].period_start_date, date("2024-03-01"));
    }

    #[test]
    fn window_drops_old_samples() {
        let samples = vec![
            sample("2023-01-15", FlowLevel::Medium),
            sample("2023-06-15", FlowLevel::Medium),
        ];
        let kept = within_months(&samples, 12, date("2024-03-01"));
        assert_eq!(kept, vec![sample("2023-06-15", FlowLevel::Medium)]);
    }
}
