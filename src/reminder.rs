use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

pub type ReminderId = u64;

const MINUTE: i64 = 60;
const HOUR: i64 = 3600;
const DAY: i64 = 86400;
const WEEK: i64 = 604800;

/// Cadence unit for the rearm interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl RepeatUnit {
    pub fn seconds_multiplier(self) -> i64 {
        match self {
            RepeatUnit::Second => 1,
            RepeatUnit::Minute => MINUTE,
            RepeatUnit::Hour => HOUR,
            RepeatUnit::Day => DAY,
            RepeatUnit::Week => WEEK,
        }
    }
}

/// Checklist item optionally attached to a reminder. The scheduler never
/// reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTask {
    pub name: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    /// Time-of-day; recombined with "today" every time it is evaluated.
    pub start_time: NaiveTime,
    /// Past this time-of-day the reminder is no longer (re)armed.
    pub end_time: Option<NaiveTime>,
    /// Positive integer magnitude as entered by the user; anything that
    /// fails to parse counts as 0.
    pub repeat_every: String,
    pub repeat_unit: RepeatUnit,
    /// Empty means "every day".
    pub repeat_days: Vec<Weekday>,
    pub active: bool,
    /// Seconds until the next fire. Owned by the scheduler.
    #[serde(default)]
    pub countdown: i64,
    #[serde(default)]
    pub tasks: Vec<ReminderTask>,
}

impl Reminder {
    /// Rearm interval in seconds. A non-parseable `repeat_every` degrades
    /// to 0, which refires on every tick. Magnitudes beyond i64 count as
    /// non-parseable; the multiply saturates so the interval stays
    /// non-negative.
    pub fn interval_seconds(&self) -> i64 {
        let magnitude = self
            .repeat_every
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| i64::try_from(m).ok())
            .unwrap_or(0);
        magnitude.saturating_mul(self.repeat_unit.seconds_multiplier())
    }

    pub fn fires_on(&self, weekday: Weekday) -> bool {
        self.repeat_days.is_empty() || self.repeat_days.contains(&weekday)
    }
}

/// Countdown rendering for the list surface: weeks and days are spelled
/// out, anything under a day collapses to a zero-padded clock.
pub fn format_countdown(seconds: i64) -> String {
    let secs = seconds.max(0);
    if secs >= WEEK {
        let (w, rem) = (secs / WEEK, secs % WEEK);
        let (d, rem) = (rem / DAY, rem % DAY);
        let (h, rem) = (rem / HOUR, rem % HOUR);
        let (m, s) = (rem / MINUTE, rem % MINUTE);
        format!("{w}w {d}d {h}h {m}m {s}s")
    } else if secs >= DAY {
        let (d, rem) = (secs / DAY, secs % DAY);
        let (h, rem) = (rem / HOUR, rem % HOUR);
        let (m, s) = (rem / MINUTE, rem % MINUTE);
        format!("{d}d {h}h {m}m {s}s")
    } else {
        format!(
            "{:02}:{:02}:{:02}",
            secs / HOUR,
            (secs % HOUR) / MINUTE,
            secs % MINUTE
        )
    }
}
