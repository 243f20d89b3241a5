use std::sync::Arc;

use crate::notify::{Notifier, PermissionStatus};
use crate::reminder::{Reminder, ReminderId, format_countdown};
use crate::scheduling::Scheduler;
use crate::storage::{NewReminder, ReminderStorage, ReminderUpdate};

/// Row handed to the list surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderView {
    pub title: String,
    pub countdown: String,
    pub active: bool,
}

/// Front door for the list and edit surfaces. Every write goes through
/// the scheduler and then persists the whole set; failures are logged and
/// swallowed so the caller never sees an error, but the typed errors
/// still exist at the storage and notifier seams.
pub struct ReminderService {
    scheduler: Scheduler,
    storage: Arc<dyn ReminderStorage>,
    notifier: Arc<dyn Notifier>,
}

impl ReminderService {
    pub fn new(storage: Arc<dyn ReminderStorage>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            scheduler: Scheduler::new(Arc::clone(&notifier)),
            storage,
            notifier,
        }
    }

    pub fn open(&mut self) {
        self.scheduler.open();
    }

    pub async fn close(&mut self) {
        self.scheduler.close().await;
    }

    /// The app-foreground path: read the stored set, swap it in and arm
    /// every active reminder. A decode failure starts the app empty.
    pub async fn load(&self) {
        let reminders = match self.storage.load().await {
            Ok(reminders) => reminders,
            Err(error) => {
                log::warn!("Could not load saved reminders, starting empty. [error = {error}]");
                Vec::new()
            }
        };

        self.scheduler.replace_all(reminders).await;
        self.scheduler.arm_all().await;
    }

    /// Persists the current record set. The first save on a device with an
    /// undetermined permission status performs one permission round-trip
    /// before writing; the write itself never depends on the outcome.
    pub async fn save(&self) {
        if self.notifier.permission_status() == PermissionStatus::Undetermined {
            match self.notifier.request_permission().await {
                Ok(true) => log::info!("Notification permission granted"),
                Ok(false) => {
                    log::warn!("Notification permission denied; reminders are kept but alerts will not show")
                }
                Err(error) => {
                    log::warn!("Could not request notification permission. [error = {error}]")
                }
            }
        }

        let snapshot = self.scheduler.snapshot().await;
        if let Err(error) = self.storage.save(&snapshot).await {
            log::warn!("Could not persist reminders. [error = {error}]");
        }
    }

    /// Creates a reminder, arms it immediately and persists.
    pub async fn create(&self, new: NewReminder) -> Reminder {
        let reminder = self.scheduler.insert(new).await;
        self.scheduler.arm(reminder.id).await;
        self.save().await;
        reminder
    }

    /// Edits fields in place. The countdown keeps running; only a re-arm
    /// resets it.
    pub async fn update(&self, update: ReminderUpdate) -> bool {
        let updated = self.scheduler.update(update).await;
        if updated {
            self.save().await;
        }
        updated
    }

    pub async fn delete(&self, id: ReminderId) {
        self.scheduler.remove(id).await;
        self.save().await;
    }

    pub async fn toggle_active(&self, id: ReminderId, value: bool) {
        self.scheduler.toggle_active(id, value).await;
        self.save().await;
    }

    /// Rows for the list surface, in record order.
    pub async fn list(&self) -> Vec<ReminderView> {
        self.scheduler
            .snapshot()
            .await
            .into_iter()
            .map(|reminder| ReminderView {
                title: reminder.title,
                countdown: format_countdown(reminder.countdown),
                active: reminder.active,
            })
            .collect()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
