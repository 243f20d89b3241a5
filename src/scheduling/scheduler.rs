use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{Local, NaiveTime};
use tokio::{sync::RwLock, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::notify::Notifier;
use crate::reminder::{Reminder, ReminderId};
use crate::storage::{NewReminder, ReminderUpdate};

use super::arming::{self, ArmDecision};

const NOTIFICATION_BODY: &str = "It's time!";
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Live tick registration for one armed reminder. The interval and end
/// time are captured at arm time; re-arming refreshes them.
struct ArmedTick {
    interval_seconds: i64,
    end_time: Option<NaiveTime>,
}

#[derive(Default)]
struct SchedulerState {
    reminders: Vec<Reminder>,
    armed: HashMap<ReminderId, ArmedTick>,
}

struct TickTask {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl TickTask {
    pub async fn cancel(self, timeout: Duration) {
        self.cancellation_token.cancel();
        let cancel_with_timeout = time::timeout(timeout, self.task_handle);
        let _ = cancel_with_timeout.await;
    }
}

/// Owns the reminder records and the armed-tick map, and drives both from
/// a single once-per-second loop between `open` and `close`.
///
/// All armed countdowns advance on that one loop, so within a reminder the
/// decrement / fire / end-time check sequence never overlaps itself.
pub struct Scheduler {
    state: Arc<RwLock<SchedulerState>>,
    notifier: Arc<dyn Notifier>,
    tick_task: Option<TickTask>,
}

impl Scheduler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SchedulerState::default())),
            notifier,
            tick_task: None,
        }
    }

    /// Starts the tick loop. Opening an already-open scheduler is a no-op.
    pub fn open(&mut self) {
        if self.tick_task.is_some() {
            return;
        }

        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let state = Arc::clone(&self.state);
        let notifier = Arc::clone(&self.notifier);

        let task_handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = task_cancellation_token.cancelled() => {
                        log::info!("Tick loop shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        Self::tick_once(&state, notifier.as_ref()).await;
                    }
                }
            }
        });

        self.tick_task = Some(TickTask {
            task_handle,
            cancellation_token,
        });
    }

    /// Stops the tick loop. Armed state is left in place so a later `open`
    /// resumes the same countdowns.
    pub async fn close(&mut self) {
        if let Some(tick_task) = self.tick_task.take() {
            tick_task.cancel(CLOSE_TIMEOUT).await;
        }
    }

    /// One pass over the armed map: advance every countdown, then deliver
    /// whatever fired with the lock released.
    async fn tick_once(state: &RwLock<SchedulerState>, notifier: &dyn Notifier) {
        let now = Local::now().naive_local();

        let fired = {
            let mut state = state.write().await;
            let state = &mut *state;

            let entries: Vec<(ReminderId, i64, Option<NaiveTime>)> = state
                .armed
                .iter()
                .map(|(id, tick)| (*id, tick.interval_seconds, tick.end_time))
                .collect();

            let mut fired = Vec::new();
            let mut disarmed = Vec::new();
            for (id, interval_seconds, end_time) in entries {
                let Some(reminder) = state.reminders.iter_mut().find(|r| r.id == id) else {
                    disarmed.push(id);
                    continue;
                };

                let outcome = arming::apply_tick(reminder.countdown, interval_seconds, end_time, now);
                reminder.countdown = outcome.countdown;
                if outcome.fired {
                    fired.push((id, reminder.title.clone()));
                }
                if outcome.disarm {
                    log::info!("Reminder passed its end time, disarming. [reminder_id = {id}]");
                    disarmed.push(id);
                }
            }

            for id in disarmed {
                state.armed.remove(&id);
            }

            fired
        };

        for (id, title) in fired {
            if let Err(error) = notifier.fire(id, &title, NOTIFICATION_BODY).await {
                log::warn!("Could not deliver notification. [reminder_id = {id}, error = {error}]");
            }
        }
    }

    /// Arms every active, not-yet-armed reminder that qualifies today.
    pub async fn arm_all(&self) {
        self.arm_scoped(None).await;
    }

    /// Arms a single reminder; arming an already-armed id is a no-op.
    pub async fn arm(&self, id: ReminderId) {
        self.arm_scoped(Some(id)).await;
    }

    async fn arm_scoped(&self, scope: Option<ReminderId>) {
        let now = Local::now().naive_local();
        let mut state = self.state.write().await;
        let state = &mut *state;

        for reminder in state.reminders.iter_mut() {
            if scope.is_some_and(|id| id != reminder.id) {
                continue;
            }
            if !reminder.active || state.armed.contains_key(&reminder.id) {
                continue;
            }

            match arming::evaluate_arm(reminder, now) {
                ArmDecision::Arm {
                    initial_countdown,
                    interval_seconds,
                } => {
                    reminder.countdown = initial_countdown;
                    state.armed.insert(
                        reminder.id,
                        ArmedTick {
                            interval_seconds,
                            end_time: reminder.end_time,
                        },
                    );
                    log::info!(
                        "Armed reminder. [reminder_id = {}, countdown = {}, interval = {}]",
                        reminder.id,
                        initial_countdown,
                        interval_seconds
                    );
                }
                ArmDecision::Skip(reason) => {
                    log::debug!(
                        "Skipped arming reminder. [reminder_id = {}, reason = {reason:?}]",
                        reminder.id
                    );
                }
            }
        }
    }

    /// Drops every live tick registration. Records and their countdowns
    /// stay as they are.
    pub async fn disarm_all(&self) {
        let mut state = self.state.write().await;
        state.armed.clear();
    }

    /// Flips the active flag. Turning a reminder on arms just that one;
    /// turning one off disarms *everything*, matching the app's observed
    /// behavior (the next arm_all re-arms the survivors).
    pub async fn toggle_active(&self, id: ReminderId, value: bool) {
        {
            let mut state = self.state.write().await;
            let Some(reminder) = state.reminders.iter_mut().find(|r| r.id == id) else {
                return;
            };
            reminder.active = value;
        }

        if value {
            self.arm(id).await;
        } else {
            self.disarm_all().await;
        }
    }

    /// Deletes the record, cancelling its tick registration first.
    pub async fn remove(&self, id: ReminderId) {
        let mut state = self.state.write().await;
        state.armed.remove(&id);
        state.reminders.retain(|r| r.id != id);
    }

    /// Swaps in a freshly loaded record set. Everything is disarmed; the
    /// caller re-arms with `arm_all`.
    pub async fn replace_all(&self, reminders: Vec<Reminder>) {
        let mut state = self.state.write().await;
        state.armed.clear();
        state.reminders = reminders;
    }

    /// Creates a record from the draft, assigns the next free id and
    /// returns the stored reminder. New reminders start active with a zero
    /// countdown; the caller arms them.
    pub async fn insert(&self, new: NewReminder) -> Reminder {
        let mut state = self.state.write().await;
        let id = state.reminders.iter().map(|r| r.id).max().map_or(1, |id| id + 1);
        let reminder = Reminder {
            id,
            title: new.title,
            start_time: new.start_time,
            end_time: new.end_time,
            repeat_every: new.repeat_every,
            repeat_unit: new.repeat_unit,
            repeat_days: new.repeat_days,
            active: true,
            countdown: 0,
            tasks: Vec::new(),
        };
        state.reminders.push(reminder.clone());
        reminder
    }

    /// Merges the given fields into the record in place. The countdown and
    /// the tick registration are untouched until the reminder is re-armed.
    pub async fn update(&self, update: ReminderUpdate) -> bool {
        let mut state = self.state.write().await;
        let Some(reminder) = state.reminders.iter_mut().find(|r| r.id == update.id) else {
            return false;
        };

        if let Some(title) = update.title {
            reminder.title = title;
        }
        if let Some(start_time) = update.start_time {
            reminder.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            reminder.end_time = end_time;
        }
        if let Some(repeat_every) = update.repeat_every {
            reminder.repeat_every = repeat_every;
        }
        if let Some(repeat_unit) = update.repeat_unit {
            reminder.repeat_unit = repeat_unit;
        }
        if let Some(repeat_days) = update.repeat_days {
            reminder.repeat_days = repeat_days;
        }

        true
    }

    pub async fn get(&self, id: ReminderId) -> Option<Reminder> {
        let state = self.state.read().await;
        state.reminders.iter().find(|r| r.id == id).cloned()
    }

    /// Clone of the full record set, in insertion order.
    pub async fn snapshot(&self) -> Vec<Reminder> {
        let state = self.state.read().await;
        state.reminders.clone()
    }

    pub async fn armed_count(&self) -> usize {
        let state = self.state.read().await;
        state.armed.len()
    }

    pub async fn is_armed(&self, id: ReminderId) -> bool {
        let state = self.state.read().await;
        state.armed.contains_key(&id)
    }
}
