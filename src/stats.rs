use crate::config::PredictionConfig;
use crate::models::{CycleRecord, CycleSummary};

/// Truncating mean of the recorded cycle lengths, or 28 when none are set.
pub fn average_cycle_length(records: &[CycleRecord]) -> u32 {
    average_cycle_length_with(records, &PredictionConfig::default())
}

/// Truncating mean of the logged period lengths, or 5 when none can be computed.
pub fn average_period_length(records: &[CycleRecord]) -> u32 {
    average_period_length_with(records, &PredictionConfig::default())
}

/// Records without a `cycle_length` are skipped, not counted as zero.
pub fn average_cycle_length_with(records: &[CycleRecord], config: &PredictionConfig) -> u32 {
    let lengths = records.iter().filter_map(|r| r.cycle_length);
    match truncating_mean(lengths) {
        Some(avg) => avg,
        None => {
            tracing::trace!(
                default = config.default_cycle_length,
                "no cycle lengths recorded, using default"
            );
            config.default_cycle_length
        }
    }
}

/// Only records with an end date on or after their start contribute.
pub fn average_period_length_with(records: &[CycleRecord], config: &PredictionConfig) -> u32 {
    let lengths = records.iter().filter_map(CycleRecord::period_length);
    match truncating_mean(lengths) {
        Some(avg) => avg,
        None => {
            tracing::trace!(
                default = config.default_period_length,
                "no complete periods recorded, using default"
            );
            config.default_period_length
        }
    }
}

/// Compute summary figures for the stats view.
/// Unlike the averages above, missing data stays `None` instead of a default.
pub fn cycle_summary(records: &[CycleRecord]) -> CycleSummary {
    let cycle_lengths: Vec<u32> = records.iter().filter_map(|r| r.cycle_length).collect();
    let period_lengths: Vec<u32> = records.iter().filter_map(CycleRecord::period_length).collect();
    let last = records.last();

    CycleSummary {
        total_cycles: records.len(),
        avg_cycle_length: float_mean(&cycle_lengths),
        avg_period_length: float_mean(&period_lengths),
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: last.map(|r| r.period_start_date),
        last_period_end: last.and_then(|r| r.period_end_date),
    }
}

fn truncating_mean(values: impl Iterator<Item = u32>) -> Option<u32> {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return None;
    }
    u32::try_from(sum / count).ok()
}

fn float_mean(values: &[u32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    Some(sum as f32 / values.len() as f32)
}
