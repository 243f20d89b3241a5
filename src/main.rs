use std::sync::Arc;

use tickler::appsettings;
use tickler::notify::{LogNotifier, Notifier};
use tickler::service::ReminderService;
use tickler::storage::{JsonFileStorage, ReminderStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::get();
    let storage: Arc<dyn ReminderStorage> =
        Arc::new(JsonFileStorage::new(&settings.storage.path));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let mut service = ReminderService::new(storage, notifier);
    service.load().await;
    service.open();
    log::info!(
        "Reminder scheduler running. [store = {}]",
        settings.storage.path
    );

    tokio::signal::ctrl_c().await?;

    log::info!("Shutting down");
    service.save().await;
    service.close().await;

    Ok(())
}
