use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstruation,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    pub const ALL: [CyclePhase; 4] = [
        CyclePhase::Menstruation,
        CyclePhase::Follicular,
        CyclePhase::Ovulation,
        CyclePhase::Luteal,
    ];
}

/// Display metadata for a phase. Presentation only.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PhaseMetadata {
    pub label: &'static str,
    pub description: &'static str,
    pub symbol: &'static str,
    pub color: &'static str,
}

pub fn metadata(phase: CyclePhase) -> PhaseMetadata {
    match phase {
        CyclePhase::Menstruation => PhaseMetadata {
            label: "Period",
            description: "Your period is here. Focus on rest and comfort.",
            symbol: "🩸",
            color: "phaseRed",
        },
        CyclePhase::Follicular => PhaseMetadata {
            label: "Follicular",
            description: "Energy is rising. Great time for new projects.",
            symbol: "🌱",
            color: "phaseGreen",
        },
        CyclePhase::Ovulation => PhaseMetadata {
            label: "Ovulation",
            description: "Peak energy and sociability.",
            symbol: "☀️",
            color: "phaseYellow",
        },
        CyclePhase::Luteal => PhaseMetadata {
            label: "Luteal (PMS)",
            description: "Winding down. Practice extra self-care.",
            symbol: "🌙",
            color: "phasePurple",
        },
    }
}

/// Transition dates of the cycle containing (or most recently preceding)
/// the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleBoundaries {
    pub last_period_start: NaiveDate,
    pub period_length: u32,
    pub ovulation_date: NaiveDate,
    pub pms_start: NaiveDate,
    pub next_period_start: NaiveDate,
}

/// Classify `reference_date` into one of the four phases.
///
/// Intervals are closed on the left and open on the right, checked in order:
///
/// ```text
/// [last_period_start, period_end)  Menstruation
/// [period_end, ovulation_date)     Follicular
/// [ovulation_date, pms_start)      Ovulation
/// [pms_start, next_period_start)   Luteal
/// [next_period_start, ..)          Menstruation
/// ```
///
/// A date on a boundary belongs to the later phase. Dates before
/// `last_period_start`, inconsistent boundaries, and an unrepresentable
/// `period_end` all fall back to Follicular.
pub fn determine_phase(reference_date: NaiveDate, bounds: &CycleBoundaries) -> CyclePhase {
    let Some(period_end) = bounds
        .last_period_start
        .checked_add_days(Days::new(u64::from(bounds.period_length)))
    else {
        return CyclePhase::Follicular;
    };

    let in_range = |start: NaiveDate, end: NaiveDate| reference_date >= start && reference_date < end;

    if in_range(bounds.last_period_start, period_end) {
        CyclePhase::Menstruation
    } else if in_range(period_end, bounds.ovulation_date) {
        CyclePhase::Follicular
    } else if in_range(bounds.ovulation_date, bounds.pms_start) {
        CyclePhase::Ovulation
    } else if in_range(bounds.pms_start, bounds.next_period_start) {
        CyclePhase::Luteal
    } else if reference_date >= bounds.next_period_start {
        // No boundary beyond this one is known; assume the next cycle began.
        CyclePhase::Menstruation
    } else {
        CyclePhase::Follicular
    }
}
