use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{CyclePrediction, ReminderSettings};
use crate::phase;

/// When a planned reminder should fire, in local wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Trigger {
    Once { at: NaiveDateTime },
    Daily { hour: u32 },
}

/// A reminder ready to hand to the platform scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub body: String,
    pub trigger: Trigger,
}

/// Plan the reminder set for a prediction. The result replaces any
/// previously scheduled reminders.
///
/// One-shot reminders that would fire at or before `now` are left out.
pub fn plan_reminders(
    prediction: &CyclePrediction,
    settings: &ReminderSettings,
    now: NaiveDateTime,
) -> Vec<Reminder> {
    if !settings.enabled {
        return Vec::new();
    }

    let mut planned = Vec::with_capacity(3);

    if let Some(at) = alert_time(prediction.pms_window_start, settings.pms_lead_days, settings.hour) {
        planned.push(Reminder {
            id: format!("pms-alert-{}", at.date()),
            title: "PMS Heads Up".into(),
            body: format!(
                "PMS may start in ~{} days. Check today's tips for some self-care ideas.",
                settings.pms_lead_days
            ),
            trigger: Trigger::Once { at },
        });
    }

    if let Some(at) = alert_time(prediction.next_period_start, settings.period_lead_days, settings.hour) {
        planned.push(Reminder {
            id: format!("period-alert-{}", at.date()),
            title: "Period Coming Soon".into(),
            body: period_body(settings.period_lead_days),
            trigger: Trigger::Once { at },
        });
    }

    planned.retain(|r| match r.trigger {
        Trigger::Once { at } => at > now,
        Trigger::Daily { .. } => true,
    });

    planned.push(Reminder {
        id: "daily-checkin".into(),
        title: "Daily Check-In".into(),
        body: format!(
            "How are you feeling today? Tap to log and get tips for your {} phase.",
            phase::metadata(prediction.current_phase).label
        ),
        trigger: Trigger::Daily { hour: settings.hour },
    });

    tracing::debug!(count = planned.len(), "planned reminders");
    planned
}

fn alert_time(target: NaiveDate, lead_days: u32, hour: u32) -> Option<NaiveDateTime> {
    target
        .checked_sub_days(Days::new(u64::from(lead_days)))?
        .and_hms_opt(hour, 0, 0)
}

fn period_body(lead_days: u32) -> String {
    match lead_days {
        0 => "Your period is predicted to start today. Be prepared!".into(),
        1 => "Your period is predicted to start tomorrow. Be prepared!".into(),
        n => format!("Your period is predicted to start in {n} days. Be prepared!"),
    }
}
