use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{ReminderStorage, StorageError};
use crate::reminder::Reminder;

/// Stores the full reminder set as one JSON file. A missing file loads as
/// an empty set; a corrupt one surfaces as `StorageError::Decode`.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReminderStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<Reminder>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&content).map_err(StorageError::Decode)
    }

    async fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(reminders).map_err(StorageError::Encode)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}
