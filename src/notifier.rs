//! Desktop notifications and terminal chime.

use std::io::Write;
use std::sync::Mutex;

use agenda_core::config::AgendaConfig;
use agenda_core::notify::{Notification, Notifier, Permission};
use agenda_core::{AgendaError, AgendaResult};
use dialoguer::Confirm;
use tracing::warn;

pub struct DesktopNotifier {
    config: Mutex<AgendaConfig>,
}

impl DesktopNotifier {
    pub fn new(config: AgendaConfig) -> Self {
        DesktopNotifier {
            config: Mutex::new(config),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        self.config
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .notifications
    }

    /// Ask once; the answer is remembered in the config file.
    fn request_permission(&self) -> Permission {
        let mut config = self.config.lock().unwrap_or_else(|e| e.into_inner());
        if config.notifications != Permission::Default {
            return config.notifications;
        }

        let answer = Confirm::new()
            .with_prompt("  Show desktop notifications for reminders?")
            .default(true)
            .interact();

        // No terminal to ask on: stay undecided so a later run can ask
        let Some(permission) = decided(answer) else {
            return Permission::Default;
        };
        config.notifications = permission;

        if let Err(e) = config.save() {
            warn!(error = %e, "could not remember notification choice");
        }
        config.notifications
    }

    fn notify(&self, notification: &Notification) -> AgendaResult<()> {
        notify_rust::Notification::new()
            .appname("agenda")
            .summary(&notification.title)
            .body(&notification.body)
            .show()
            .map_err(|e| AgendaError::Notification(e.to_string()))?;
        Ok(())
    }

    fn chime(&self) -> AgendaResult<()> {
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// The permission a prompt answer settles on, or `None` when the prompt
/// could not be shown.
fn decided<E: std::fmt::Display>(answer: Result<bool, E>) -> Option<Permission> {
    match answer {
        Ok(true) => Some(Permission::Granted),
        Ok(false) => Some(Permission::Denied),
        Err(e) => {
            warn!(error = %e, "could not ask about desktop notifications");
            None
        }
    }
}
