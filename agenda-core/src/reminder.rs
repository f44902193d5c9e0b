//! Periodic reminder evaluation.
//!
//! A reminder moves from armed to triggered exactly once. Each tick reads
//! the current events, picks the armed reminders whose window contains
//! `now`, and for each one re-checks and sets the latch under the store
//! lock before notifying. Notification happens only for latches this tick
//! actually set, so a reminder never fires twice.
//!
//! Windows shorter than the tick period can be missed.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::event::Event;
use crate::notify::{Notification, Notifier, Permission};
use crate::store::{KeyValueStore, SharedStore};

/// Ids of occurrences whose armed reminder is due at `now`:
/// `datetime - minutes_before <= now < datetime`.
pub fn due_reminders(events: &[Event], now: NaiveDateTime) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.reminder.is_some_and(|r| r.is_due(e.datetime, now)))
        .map(|e| e.id.clone())
        .collect()
}

pub struct ReminderScheduler<S: KeyValueStore> {
    store: SharedStore<S>,
    notifier: Arc<dyn Notifier>,
    title: String,
    reload: bool,
}

impl<S: KeyValueStore + 'static> ReminderScheduler<S> {
    pub fn new(store: SharedStore<S>, notifier: Arc<dyn Notifier>, title: impl Into<String>) -> Self {
        ReminderScheduler {
            store,
            notifier,
            title: title.into(),
            reload: false,
        }
    }

    /// Re-read the backend before scanning and before each latch, for
    /// backends that other processes also write to.
    pub fn reload_each_tick(mut self) -> Self {
        self.reload = true;
        self
    }

    /// Run one evaluation pass. Returns the ids whose reminder fired.
    pub fn tick(&self) -> Vec<String> {
        let due = {
            let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
            if self.reload {
                store.reload();
            }
            due_reminders(store.events(), store.now())
        };

        let mut fired = Vec::new();
        for id in due {
            // Re-read under the lock; a user edit may have landed since the scan
            let latched = {
                let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
                if self.reload {
                    store.reload();
                }
                store.mark_triggered(&id)
            };

            match latched {
                Ok(Some(event)) => {
                    self.deliver(&event);
                    fired.push(id);
                }
                Ok(None) => debug!(id, "reminder no longer due"),
                Err(e) => warn!(id, error = %e, "could not update reminder"),
            }
        }

        fired
    }

    /// Start ticking every `period` on the current tokio runtime.
    /// The first tick runs immediately.
    pub fn spawn(self, period: Duration) -> SchedulerHandle {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let fired = self.tick();
                if !fired.is_empty() {
                    info!(count = fired.len(), "reminders fired");
                }
            }
        });

        SchedulerHandle { task }
    }

    fn deliver(&self, event: &Event) {
        let minutes = event.reminder.map(|r| r.minutes_before).unwrap_or_default();

        if let Err(e) = self.notifier.chime() {
            warn!(error = %e, "could not play reminder sound");
        }

        match self.notifier.permission() {
            Permission::Granted => {
                let notification = Notification::for_event(&self.title, event, minutes);
                if let Err(e) = self.notifier.notify(&notification) {
                    warn!(id = %event.id, error = %e, "could not show notification");
                }
            }
            permission => debug!(?permission, id = %event.id, "notification not permitted"),
        }
    }
}

/// Owns the running scheduler task. Dropping it stops the ticks.
pub struct SchedulerHandle {
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn shutdown(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
