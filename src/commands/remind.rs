use agenda_core::config::AgendaConfig;
use agenda_core::notify::{Notifier, Permission};
use agenda_core::store::{EventStore, FileStore};
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::notifier::DesktopNotifier;

/// Arm a reminder `minutes` before the occurrence, or clear it with `None`.
pub fn run(
    store: &mut EventStore<FileStore>,
    id: &str,
    minutes: Option<i64>,
    config: AgendaConfig,
) -> Result<()> {
    let title = store.get(id).map(|e| e.title.clone()).unwrap_or_default();

    let Some(minutes) = minutes else {
        store.clear_reminder(id)?;
        println!("{}", format!("  Reminder off: {}", title).dimmed());
        return Ok(());
    };

    store.toggle_reminder(id, minutes)?;
    println!(
        "{}",
        format!("  Reminder set: {} ({} minutes before)", title, minutes).green()
    );

    match DesktopNotifier::new(config).request_permission() {
        Permission::Denied => println!(
            "{}",
            "  Desktop notifications are off; `agenda watch` will only chime.".yellow()
        ),
        Permission::Default => println!(
            "{}",
            "  Run `agenda remind` from a terminal to turn on desktop notifications.".dimmed()
        ),
        Permission::Granted => {}
    }
    Ok(())
}
