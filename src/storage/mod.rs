mod json_file;
mod memory;
mod model;

pub use json_file::JsonFileStorage;
pub use memory::InMemoryStorage;
pub use model::{NewReminder, ReminderUpdate};

use async_trait::async_trait;
use thiserror::Error;

use crate::reminder::Reminder;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not access the reminder store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode the stored reminders: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Could not encode the reminders: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Persistence seam. The whole record set is written and read as one
/// blob; there is no partial save and no schema migration.
#[async_trait]
pub trait ReminderStorage: Send + Sync {
    async fn load(&self) -> Result<Vec<Reminder>, StorageError>;

    async fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError>;
}
