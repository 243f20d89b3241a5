use async_trait::async_trait;
use thiserror::Error;

use crate::reminder::ReminderId;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification backend unavailable: {0}")]
    Backend(String),

    #[error("Notification permission was denied")]
    PermissionDenied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Delivery seam for local alerts. Firing is best-effort; the scheduler
/// logs failures and never retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn permission_status(&self) -> PermissionStatus;

    async fn request_permission(&self) -> Result<bool, NotifyError>;

    async fn fire(&self, id: ReminderId, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that writes alerts to the log. Stands in for a platform
/// notification API and never needs permission.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn permission_status(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request_permission(&self) -> Result<bool, NotifyError> {
        Ok(true)
    }

    async fn fire(&self, id: ReminderId, title: &str, body: &str) -> Result<(), NotifyError> {
        log::info!("{title}: {body} [reminder_id = {id}]");
        Ok(())
    }
}
