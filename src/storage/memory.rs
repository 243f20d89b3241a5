use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ReminderStorage, StorageError};
use crate::reminder::Reminder;

/// Keeps the record set in memory. Used by tests and as a stand-in store
/// when nothing should touch the disk.
#[derive(Default)]
pub struct InMemoryStorage {
    store: RwLock<Vec<Reminder>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderStorage for InMemoryStorage {
    async fn load(&self) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        Ok(store.clone())
    }

    async fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        *store = reminders.to_vec();
        Ok(())
    }
}
