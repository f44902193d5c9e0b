//! Notification capability used by the reminder scheduler.

use serde::{Deserialize, Serialize};

use crate::error::AgendaResult;
use crate::event::Event;

/// Whether the user allows system notifications.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not decided yet; may be asked on an explicit user action.
    #[default]
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_event(title: &str, event: &Event, minutes_before: i64) -> Self {
        Notification {
            title: title.to_string(),
            body: format!(
                "The event \"{}\" will start in {} minutes",
                event.title, minutes_before
            ),
        }
    }
}

/// Where reminders end up: a system notification plus an audible chime.
pub trait Notifier: Send + Sync {
    fn permission(&self) -> Permission;

    /// Ask the user for permission. Only call this from an explicit user action.
    fn request_permission(&self) -> Permission;

    fn notify(&self, notification: &Notification) -> AgendaResult<()>;

    fn chime(&self) -> AgendaResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NewEvent;
    use chrono::NaiveDate;

    #[test]
    fn body_names_event_and_lead_time() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 20)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let event = NewEvent::new("Concert", at).into_event("a".into());
        let n = Notification::for_event("Event reminder", &event, 10);

        assert_eq!(n.title, "Event reminder");
        assert_eq!(n.body, "The event \"Concert\" will start in 10 minutes");
    }

    #[test]
    fn permission_parses_lowercase() {
        let p: Permission = serde_json::from_str("\"granted\"").unwrap();
        assert_eq!(p, Permission::Granted);
        assert_eq!(Permission::default(), Permission::Default);
    }
}
