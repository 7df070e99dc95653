//! Property-based tests for the prediction engine.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crate::models::{CycleRecord, DataSource};
use crate::phase::{determine_phase, CycleBoundaries, CyclePhase};
use crate::prediction::predict;
use crate::stats::average_cycle_length;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    epoch() + Days::new(offset)
}

prop_compose! {
    /// Ordered boundaries: start < period_end <= ovulation <= pms <= next.
    fn arb_boundaries()(
        start in 0u64..20_000,
        period_length in 1u32..10,
        follicular in 0u64..20,
        ovulation in 0u64..5,
        luteal in 0u64..20,
    ) -> (CycleBoundaries, NaiveDate) {
        let last_period_start = day(start);
        let period_end = last_period_start + Days::new(u64::from(period_length));
        let ovulation_date = period_end + Days::new(follicular);
        let pms_start = ovulation_date + Days::new(ovulation);
        let next_period_start = pms_start + Days::new(luteal);
        (
            CycleBoundaries {
                last_period_start,
                period_length,
                ovulation_date,
                pms_start,
                next_period_start,
            },
            period_end,
        )
    }
}

prop_compose! {
    fn arb_history()(
        first in 0u64..20_000,
        gaps in prop::collection::vec((18u32..45, any::<bool>()), 0..8),
    ) -> Vec<CycleRecord> {
        let mut start = day(first);
        let mut records = vec![CycleRecord::new(start, DataSource::Manual)];
        for (gap, recorded) in gaps {
            start = start + Days::new(u64::from(gap));
            let mut record = CycleRecord::new(start, DataSource::Platform);
            record.cycle_length = recorded.then_some(gap);
            records.push(record);
        }
        records
    }
}

proptest! {
    #[test]
    fn phases_partition_the_cycle((bounds, period_end) in arb_boundaries(), offset in 0u64..80) {
        let reference = bounds.last_period_start + Days::new(offset);
        let in_range = |a: NaiveDate, b: NaiveDate| reference >= a && reference < b;

        let expected = [
            (in_range(bounds.last_period_start, period_end), CyclePhase::Menstruation),
            (in_range(period_end, bounds.ovulation_date), CyclePhase::Follicular),
            (in_range(bounds.ovulation_date, bounds.pms_start), CyclePhase::Ovulation),
            (in_range(bounds.pms_start, bounds.next_period_start), CyclePhase::Luteal),
            (reference >= bounds.next_period_start, CyclePhase::Menstruation),
        ];
        let matching: Vec<CyclePhase> = expected.iter().filter(|(hit, _)| *hit).map(|(_, p)| *p).collect();

        prop_assert_eq!(matching.len(), 1);
        prop_assert_eq!(determine_phase(reference, &bounds), matching[0]);
    }

    #[test]
    fn non_empty_history_always_predicts(records in arb_history(), offset in 0u64..25_000) {
        let reference = day(offset);
        let prediction = predict(&records, reference);
        prop_assert!(prediction.is_some());

        let prediction = prediction.unwrap();
        let until_next = (prediction.next_period_start - reference).num_days().max(0);
        let until_pms = (prediction.pms_window_start - reference).num_days().max(0);
        prop_assert_eq!(i64::from(prediction.days_until_next_period), until_next);
        prop_assert_eq!(i64::from(prediction.days_until_pms), until_pms);
        prop_assert!(prediction.pms_window_start < prediction.pms_window_end);
        prop_assert!(prediction.pms_window_end < prediction.next_period_start);
    }

    #[test]
    fn average_ignores_missing_lengths(records in arb_history()) {
        let lengths: Vec<u32> = records.iter().filter_map(|r| r.cycle_length).collect();
        let expected = if lengths.is_empty() {
            28
        } else {
            lengths.iter().sum::<u32>() / lengths.len() as u32
        };
        prop_assert_eq!(average_cycle_length(&records), expected);
    }
}
