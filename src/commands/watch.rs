use std::sync::Arc;

use agenda_core::config::AgendaConfig;
use agenda_core::reminder::ReminderScheduler;
use agenda_core::store::{EventStore, FileStore};
use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::info;

use crate::notifier::DesktopNotifier;

pub async fn run(store: EventStore<FileStore>, config: AgendaConfig) -> Result<()> {
    let period = config.reminder_period()?;
    let title = config.notification_title.clone();
    let data_dir = store.backend().dir().to_path_buf();

    // Other `agenda` invocations write the same files while we run
    let handle = ReminderScheduler::new(store.shared(), Arc::new(DesktopNotifier::new(config)), title)
        .reload_each_tick()
        .spawn(period);

    println!(
        "{}",
        format!(
            "  Watching {} every {} (Ctrl-C to stop)",
            data_dir.display(),
            humantime::format_duration(period)
        )
        .dimmed()
    );

    tokio::signal::ctrl_c().await?;
    info!("stopping reminder scheduler");
    handle.shutdown();

    Ok(())
}
