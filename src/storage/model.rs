use chrono::{NaiveTime, Weekday};

use crate::reminder::{ReminderId, RepeatUnit};

/// Fields the edit surface supplies when creating a reminder. The id,
/// active flag and countdown are assigned by the scheduler.
pub struct NewReminder {
    pub title: String,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub repeat_every: String,
    pub repeat_unit: RepeatUnit,
    pub repeat_days: Vec<Weekday>,
}

/// In-place edit of an existing reminder; `None` leaves a field alone.
/// `end_time` is doubly optional so an edit can clear it.
pub struct ReminderUpdate {
    pub id: ReminderId,
    pub title: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<Option<NaiveTime>>,
    pub repeat_every: Option<String>,
    pub repeat_unit: Option<RepeatUnit>,
    pub repeat_days: Option<Vec<Weekday>>,
}
