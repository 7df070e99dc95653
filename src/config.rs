use serde::{Deserialize, Serialize};

/// Cycle length assumed when no record carries one.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
/// Period length assumed when no record has both a start and an end date.
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;
/// Ovulation is placed this many days before the predicted period.
pub const LUTEAL_PHASE_DAYS: u32 = 14;
/// PMS can start up to this many days before the period.
pub const PMS_EARLY_DAYS: u32 = 14;
/// PMS typically starts at least this many days before the period.
pub const PMS_LATE_DAYS: u32 = 7;

/// Assumptions the prediction engine works from.
///
/// `Default` reproduces the fixed constants above. Alternate values exist so
/// the classifier can be exercised with other assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub default_cycle_length: u32,
    pub default_period_length: u32,
    pub luteal_phase_days: u32,
    pub pms_early_days: u32,
    pub pms_late_days: u32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: DEFAULT_CYCLE_LENGTH,
            default_period_length: DEFAULT_PERIOD_LENGTH,
            luteal_phase_days: LUTEAL_PHASE_DAYS,
            pms_early_days: PMS_EARLY_DAYS,
            pms_late_days: PMS_LATE_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: PredictionConfig = serde_json::from_str(r#"{"pms_early_days": 12}"#).unwrap();
        assert_eq!(config.pms_early_days, 12);
        assert_eq!(config.default_cycle_length, 28);
        assert_eq!(config.default_period_length, 5);
        assert_eq!(config.luteal_phase_days, 14);
        assert_eq!(config.pms_late_days, 7);
    }
}
