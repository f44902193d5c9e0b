//! The three persisted snapshots: events, reminder map, favorite ids.
//!
//! Each is written independently under its own key. Reading never fails:
//! a snapshot that does not parse is logged and treated as empty.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::backend::KeyValueStore;
use crate::constants::{EVENTS_KEY, FAVORITES_KEY, REMINDERS_KEY};
use crate::error::{AgendaError, AgendaResult};
use crate::event::{Event, Reminder};

pub type ReminderMap = BTreeMap<String, Reminder>;

#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub reminders: ReminderMap,
    pub favorites: Vec<String>,
}

impl Snapshot {
    pub fn from_events(events: &[Event]) -> Self {
        let reminders = events
            .iter()
            .filter_map(|e| e.reminder.map(|r| (e.id.clone(), r)))
            .collect();
        let favorites = events
            .iter()
            .filter(|e| e.is_favorite)
            .map(|e| e.id.clone())
            .collect();

        Snapshot {
            events: events.to_vec(),
            reminders,
            favorites,
        }
    }

    pub fn read(backend: &impl KeyValueStore) -> Self {
        Snapshot {
            events: read_key(backend, EVENTS_KEY),
            reminders: read_key(backend, REMINDERS_KEY),
            favorites: read_key(backend, FAVORITES_KEY),
        }
    }

    /// Write all three snapshots. Every key is attempted; the first failure is returned.
    pub fn write(&self, backend: &impl KeyValueStore) -> AgendaResult<()> {
        let results = [
            write_key(backend, EVENTS_KEY, &self.events),
            write_key(backend, REMINDERS_KEY, &self.reminders),
            write_key(backend, FAVORITES_KEY, &self.favorites),
        ];
        results.into_iter().collect()
    }
}

fn read_key<T: DeserializeOwned + Default>(backend: &impl KeyValueStore, key: &str) -> T {
    match decode(backend, key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable snapshot");
            T::default()
        }
    }
}

fn decode<T: DeserializeOwned + Default>(backend: &impl KeyValueStore, key: &str) -> AgendaResult<T> {
    let Some(raw) = backend.get(key)? else {
        return Ok(T::default());
    };
    serde_json::from_str(&raw).map_err(|e| AgendaError::PersistenceCorrupt(format!("{key}: {e}")))
}

fn write_key<T: Serialize>(backend: &impl KeyValueStore, key: &str, value: &T) -> AgendaResult<()> {
    let json =
        serde_json::to_string(value).map_err(|e| AgendaError::Serialization(e.to_string()))?;
    backend.set(key, &json)
}
