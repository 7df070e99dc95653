use chrono::{Days, NaiveDate};

use crate::config::PredictionConfig;
use crate::models::{CycleRecord, CyclePrediction};
use crate::phase::{determine_phase, CycleBoundaries};
use crate::stats;

/// Predict the next period, PMS window and ovulation date using the
/// default assumptions.
///
/// `records` must be sorted ascending by `period_start_date`: the last
/// element is taken as the most recent cycle and nothing is re-sorted.
/// Returns `None` for an empty history or when date arithmetic leaves the
/// representable calendar range.
pub fn predict(records: &[CycleRecord], reference_date: NaiveDate) -> Option<CyclePrediction> {
    predict_with(records, reference_date, &PredictionConfig::default())
}

/// [`predict`] evaluated at today's local date.
pub fn predict_today(records: &[CycleRecord]) -> Option<CyclePrediction> {
    predict(records, chrono::Local::now().date_naive())
}

pub fn predict_with(
    records: &[CycleRecord],
    reference_date: NaiveDate,
    config: &PredictionConfig,
) -> Option<CyclePrediction> {
    let last_cycle = records.last()?;

    if !is_chronological(records) {
        tracing::warn!(
            records = records.len(),
            "cycle history is not sorted by start date; predicting from the last element"
        );
    }

    let avg_cycle_length = stats::average_cycle_length_with(records, config);
    let avg_period_length = stats::average_period_length_with(records, config);

    let next_period_start = last_cycle
        .period_start_date
        .checked_add_days(days(avg_cycle_length))?;
    let ovulation_date = next_period_start.checked_sub_days(days(config.luteal_phase_days))?;
    let pms_window_start = next_period_start.checked_sub_days(days(config.pms_early_days))?;
    let pms_window_end = next_period_start.checked_sub_days(days(config.pms_late_days))?;

    let current_phase = determine_phase(
        reference_date,
        &CycleBoundaries {
            last_period_start: last_cycle.period_start_date,
            period_length: avg_period_length,
            ovulation_date,
            pms_start: pms_window_start,
            next_period_start,
        },
    );

    tracing::debug!(
        avg_cycle_length,
        avg_period_length,
        %next_period_start,
        phase = ?current_phase,
        "cycle prediction computed"
    );

    Some(CyclePrediction {
        next_period_start,
        pms_window_start,
        pms_window_end,
        ovulation_date,
        current_phase,
        days_until_next_period: days_until(reference_date, next_period_start),
        days_until_pms: days_until(reference_date, pms_window_start),
        average_cycle_length: avg_cycle_length,
    })
}

/// True when records are ordered ascending by start date.
pub fn is_chronological(records: &[CycleRecord]) -> bool {
    records
        .windows(2)
        .all(|w| w[0].period_start_date <= w[1].period_start_date)
}

fn days(n: u32) -> Days {
    Days::new(u64::from(n))
}

/// Whole days from `from` to `to`, clamped at zero.
fn days_until(from: NaiveDate, to: NaiveDate) -> u32 {
    let delta = (to - from).num_days().max(0);
    u32::try_from(delta).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataSource;
    use crate::phase::CyclePhase;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_record(start: &str, cycle_length: Option<u32>) -> CycleRecord {
        let mut record = CycleRecord::new(date(start), DataSource::Manual);
        record.cycle_length = cycle_length;
        record
    }

    #[test]
    fn no_prediction_without_history() {
        assert!(predict(&[], date("2024-01-01")).is_none());
    }

    #[test]
    fn single_record_uses_defaults() {
        let records = vec![make_record("2024-01-01", None)];
        let pred = predict(&records, date("2024-01-01")).unwrap();

        assert_eq!(pred.next_period_start, date("2024-01-29"));
        assert_eq!(pred.ovulation_date, date("2024-01-15"));
        assert_eq!(pred.pms_window_start, date("2024-01-15"));
        assert_eq!(pred.pms_window_end, date("2024-01-22"));
        assert_eq!(pred.current_phase, CyclePhase::Menstruation);
        assert_eq!(pred.average_cycle_length, 28);
        assert_eq!(pred.days_until_next_period, 28);
        assert_eq!(pred.days_until_pms, 14);
    }

    #[test]
    fn mid_cycle_with_default_offsets_is_luteal() {
        // Ovulation and PMS start share the 14-day offset, so the ovulation
        // interval is empty and the date lands in the luteal check.
        let records = vec![make_record("2024-01-01", None)];
        let pred = predict(&records, date("2024-01-20")).unwrap();
        assert_eq!(pred.current_phase, CyclePhase::Luteal);

        let on_ovulation = predict(&records, date("2024-01-15")).unwrap();
        assert_eq!(on_ovulation.current_phase, CyclePhase::Luteal);
    }

    #[test]
    fn shorter_pms_offset_exposes_ovulation() {
        let config = PredictionConfig {
            pms_early_days: 12,
            ..PredictionConfig::default()
        };
        let records = vec![make_record("2024-01-01", None)];
        let pred = predict_with(&records, date("2024-01-16"), &config).unwrap();

        assert_eq!(pred.ovulation_date, date("2024-01-15"));
        assert_eq!(pred.pms_window_start, date("2024-01-17"));
        assert_eq!(pred.current_phase, CyclePhase::Ovulation);
    }

    #[test]
    fn projects_from_last_record_and_recorded_length() {
        let records = vec![
            make_record("2024-01-01", None),
            make_record("2024-01-31", Some(30)),
        ];
        let pred = predict(&records, date("2024-02-05")).unwrap();

        assert_eq!(pred.average_cycle_length, 30);
        assert_eq!(pred.next_period_start, date("2024-03-01"));
        assert_eq!(pred.current_phase, CyclePhase::Follicular);
    }

    #[test]
    fn countdowns_clamp_at_zero() {
        let records = vec![make_record("2024-01-01", None)];
        let pred = predict(&records, date("2024-03-01")).unwrap();

        assert_eq!(pred.days_until_next_period, 0);
        assert_eq!(pred.days_until_pms, 0);
        assert_eq!(pred.current_phase, CyclePhase::Menstruation);
    }

    #[test]
    fn trusts_caller_order() {
        let records = vec![
            make_record("2024-02-01", None),
            make_record("2024-01-01", None),
        ];
        assert!(!is_chronological(&records));

        let pred = predict(&records, date("2024-01-01")).unwrap();
        assert_eq!(pred.next_period_start, date("2024-01-29"));
    }

    #[test]
    fn out_of_range_arithmetic_yields_no_prediction() {
        let records = vec![CycleRecord::new(NaiveDate::MAX, DataSource::Manual)];
        assert!(predict(&records, date("2024-01-01")).is_none());
    }

    #[test]
    fn predicts_for_today() {
        let records = vec![make_record("2024-01-01", None)];
        let pred = predict_today(&records).unwrap();
        assert_eq!(pred.next_period_start, date("2024-01-29"));
    }

    #[test]
    fn repeated_calls_agree() {
        let records = vec![
            make_record("2024-01-01", None),
            make_record("2024-01-29", Some(28)),
            make_record("2024-02-28", Some(30)),
        ];
        let reference = date("2024-03-10");
        assert_eq!(predict(&records, reference), predict(&records, reference));
    }
}
