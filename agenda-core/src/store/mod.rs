//! The canonical event collection and its persistence.
//!
//! Every mutation funnels through `commit`, which prunes past occurrences,
//! sorts the rest and writes the three snapshots. A failed write is
//! reported to the caller but the in-memory collection keeps the change.

mod backend;
mod snapshot;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use snapshot::{ReminderMap, Snapshot};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, WeekdayNames};
use crate::error::{AgendaError, AgendaResult};
use crate::event::{Event, NewEvent, Reminder};
use crate::merge::{merge, prune_and_sort};
use crate::recurrence::expand_occurrences;

/// A store shared between user-driven mutations and the reminder scheduler.
/// Each mutation holds the lock for its whole read-modify-write.
pub type SharedStore<S> = Arc<Mutex<EventStore<S>>>;

pub struct EventStore<S: KeyValueStore> {
    backend: S,
    clock: Arc<dyn Clock>,
    names: WeekdayNames,
    events: Vec<Event>,
}

impl<S: KeyValueStore> EventStore<S> {
    /// Load persisted state. Unreadable snapshots start out empty.
    pub fn load(backend: S, clock: Arc<dyn Clock>, names: WeekdayNames) -> Self {
        let events = read_events(&backend, clock.now());
        debug!(count = events.len(), "loaded events");

        EventStore {
            backend,
            clock,
            names,
            events,
        }
    }

    /// Replace the in-memory collection with what the backend currently holds.
    /// Used when other processes write to the same backend.
    pub fn reload(&mut self) {
        self.events = read_events(&self.backend, self.clock.now());
    }

    pub fn shared(self) -> SharedStore<S> {
        Arc::new(Mutex::new(self))
    }

    /// Current occurrences, ascending by datetime.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Expand a submission into occurrences and merge them in.
    ///
    /// Returns the ids that were added. Fails with `PastDateRejected` when
    /// nothing lies in the future and `DuplicateRejected` when everything
    /// already exists; the store is untouched in both cases.
    pub fn create(&mut self, new: NewEvent) -> AgendaResult<Vec<String>> {
        if let Some(reminder) = new.reminder {
            Reminder::check_lead_time(reminder.minutes_before)?;
        }
        let now = self.clock.now();
        let base = new.into_event(Uuid::new_v4().to_string());

        let occurrences = expand_occurrences(&base, now, self.names);
        if occurrences.is_empty() {
            return Err(AgendaError::PastDateRejected);
        }

        let merged = merge(&self.events, occurrences, now)?;
        info!(title = %base.title, added = merged.added.len(), "scheduled event");

        self.commit(merged.events)?;
        Ok(merged.added)
    }

    /// Replace the stored occurrence with the same id. Recurrence is not re-expanded.
    pub fn update(&mut self, mut event: Event) -> AgendaResult<()> {
        let current = self.position(&event.id)?;
        if let Some(reminder) = event.reminder {
            Reminder::check_lead_time(reminder.minutes_before)?;
        }

        // The latch only resets through `toggle_reminder`
        if let (Some(old), Some(new)) = (self.events[current].reminder, event.reminder.as_mut()) {
            if old.minutes_before == new.minutes_before && new.enabled {
                new.triggered |= old.triggered;
            }
        }

        let mut events = self.events.clone();
        events[current] = event;
        self.commit(events)
    }

    pub fn delete(&mut self, id: &str) -> AgendaResult<()> {
        let current = self.position(id)?;
        let mut events = self.events.clone();
        events.remove(current);
        self.commit(events)
    }

    /// Flip the favorite flag and return its new value.
    pub fn toggle_favorite(&mut self, id: &str) -> AgendaResult<bool> {
        let current = self.position(id)?;
        let mut events = self.events.clone();
        events[current].is_favorite = !events[current].is_favorite;
        let favorite = events[current].is_favorite;
        self.commit(events)?;
        Ok(favorite)
    }

    /// Arm a reminder `minutes_before` the occurrence. Always clears the latch.
    ///
    /// Fails with `InvalidReminder` for a negative lead time or one over a year.
    pub fn toggle_reminder(&mut self, id: &str, minutes_before: i64) -> AgendaResult<()> {
        let current = self.position(id)?;
        Reminder::check_lead_time(minutes_before)?;
        let mut events = self.events.clone();
        events[current].reminder = Some(Reminder::armed(minutes_before));
        self.commit(events)
    }

    pub fn clear_reminder(&mut self, id: &str) -> AgendaResult<()> {
        let current = self.position(id)?;
        let mut events = self.events.clone();
        events[current].reminder = None;
        self.commit(events)
    }

    /// Set the reminder latch for `id` if, against current state, it is
    /// still armed and inside its window.
    ///
    /// Returns the occurrence when the latch was flipped by this call. A
    /// failed write is logged rather than returned: the in-memory latch is
    /// already set, so the reminder cannot fire twice.
    pub fn mark_triggered(&mut self, id: &str) -> AgendaResult<Option<Event>> {
        let now = self.clock.now();
        let Some(current) = self.events.iter().position(|e| e.id == id) else {
            return Ok(None);
        };

        let event = &self.events[current];
        if !event.reminder.is_some_and(|r| r.is_due(event.datetime, now)) {
            return Ok(None);
        }

        let mut events = self.events.clone();
        if let Some(reminder) = events[current].reminder.as_mut() {
            reminder.triggered = true;
        }
        let fired = events[current].clone();

        if let Err(e) = self.commit(events) {
            warn!(id, error = %e, "could not persist reminder latch");
        }
        Ok(Some(fired))
    }

    fn position(&self, id: &str) -> AgendaResult<usize> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| AgendaError::EventNotFound(id.to_string()))
    }

    fn commit(&mut self, events: Vec<Event>) -> AgendaResult<()> {
        self.events = prune_and_sort(events, self.clock.now());

        Snapshot::from_events(&self.events)
            .write(&self.backend)
            .inspect_err(|e| warn!(error = %e, "failed to persist events"))
    }
}

/// Read the snapshots and fold them into one pruned, sorted collection.
///
/// Duplicate ids keep their first entry. A reminder on the event record
/// wins; the reminder map only fills in events that carry none, so a
/// re-arm saved with the events is not undone by a stale map.
fn read_events(backend: &impl KeyValueStore, now: NaiveDateTime) -> Vec<Event> {
    let snapshot = Snapshot::read(backend);
    let favorites: HashSet<&str> = snapshot.favorites.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let events: Vec<Event> = snapshot
        .events
        .iter()
        .filter(|e| seen.insert(e.id.clone()))
        .map(|e| {
            let mut event = e.clone();
            event.is_favorite |= favorites.contains(event.id.as_str());
            if event.reminder.is_none() {
                event.reminder = snapshot.reminders.get(&event.id).copied();
            }
            event
        })
        .collect();

    prune_and_sort(events, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::event::Recurrence;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn store() -> (EventStore<MemoryStore>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(now()));
        let store = EventStore::load(MemoryStore::new(), clock.clone(), WeekdayNames::English);
        (store, clock)
    }

    fn concert(offset: Duration) -> NewEvent {
        NewEvent::new("Concert", now() + offset)
    }

    #[test]
    fn create_once_then_duplicate() {
        let (mut store, _) = store();

        let added = store.create(concert(Duration::days(2))).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(store.events()[0].datetime, now() + Duration::days(2));

        let again = store.create(concert(Duration::days(2)));
        assert!(matches!(again, Err(AgendaError::DuplicateRejected)));
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn create_in_past_is_rejected() {
        let (mut store, _) = store();
        let result = store.create(concert(-Duration::hours(1)));
        assert!(matches!(result, Err(AgendaError::PastDateRejected)));
        assert!(store.events().is_empty());
        assert!(store.backend().get(crate::constants::EVENTS_KEY).unwrap().is_none());
    }

    #[test]
    fn create_daily_is_sorted_with_unique_ids() {
        let (mut store, _) = store();
        store.create(concert(Duration::days(10))).unwrap();
        let added = store
            .create(concert(Duration::hours(1)).with_recurrence(Recurrence::Daily))
            .unwrap();

        // Same title an hour apart from the single concert, so no slot collides
        assert_eq!(added.len(), 30);
        assert_eq!(store.events().len(), 31);

        let ids: HashSet<_> = store.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 31);
        assert!(store.events().windows(2).all(|w| w[0].datetime <= w[1].datetime));
    }

    #[test]
    fn update_replaces_in_place() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::days(1))).unwrap().remove(0);

        let mut edited = store.get(&id).unwrap().clone();
        edited.title = "Recital".into();
        edited.datetime = now() + Duration::days(3);
        store.update(edited).unwrap();

        assert_eq!(store.events().len(), 1);
        assert_eq!(store.get(&id).unwrap().title, "Recital");
    }

    #[test]
    fn update_into_past_prunes() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::days(1))).unwrap().remove(0);

        let mut edited = store.get(&id).unwrap().clone();
        edited.datetime = now() - Duration::days(1);
        store.update(edited).unwrap();

        assert!(store.events().is_empty());
    }

    #[test]
    fn update_unknown_id_fails() {
        let (mut store, _) = store();
        let ghost = concert(Duration::days(1)).into_event("ghost".into());
        assert!(matches!(store.update(ghost), Err(AgendaError::EventNotFound(_))));
    }

    #[test]
    fn update_keeps_triggered_latch() {
        let (mut store, clock) = store();
        let id = store.create(concert(Duration::minutes(5))).unwrap().remove(0);
        store.toggle_reminder(&id, 10).unwrap();
        assert!(store.mark_triggered(&id).unwrap().is_some());

        let mut edited = store.get(&id).unwrap().clone();
        edited.reminder = Some(Reminder::armed(10));
        edited.title = "Concert (moved hall)".into();
        store.update(edited).unwrap();

        assert!(store.get(&id).unwrap().reminder.unwrap().triggered);
        clock.advance(Duration::minutes(1));
        assert!(store.mark_triggered(&id).unwrap().is_none());
    }

    #[test]
    fn delete_removes_and_persists() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::days(1))).unwrap().remove(0);
        store.delete(&id).unwrap();

        assert!(store.events().is_empty());
        let raw = store.backend().get(crate::constants::EVENTS_KEY).unwrap().unwrap();
        assert_eq!(raw, "[]");
        assert!(matches!(store.delete(&id), Err(AgendaError::EventNotFound(_))));
    }

    #[test]
    fn toggle_favorite_flips_and_persists_list() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::days(1))).unwrap().remove(0);

        assert!(store.toggle_favorite(&id).unwrap());
        let raw = store.backend().get(crate::constants::FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(raw, format!(r#"["{id}"]"#));

        assert!(!store.toggle_favorite(&id).unwrap());
    }

    #[test]
    fn toggle_reminder_resets_latch() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::minutes(5))).unwrap().remove(0);
        store.toggle_reminder(&id, 10).unwrap();
        store.mark_triggered(&id).unwrap();
        assert!(store.get(&id).unwrap().reminder.unwrap().triggered);

        store.toggle_reminder(&id, 15).unwrap();
        assert_eq!(store.get(&id).unwrap().reminder, Some(Reminder::armed(15)));
    }

    #[test]
    fn out_of_range_lead_time_is_rejected() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::minutes(5))).unwrap().remove(0);

        let huge = store.toggle_reminder(&id, 1_000_000_000_000);
        assert!(matches!(huge, Err(AgendaError::InvalidReminder(_))));
        assert!(matches!(
            store.toggle_reminder(&id, -1),
            Err(AgendaError::InvalidReminder(-1))
        ));
        assert!(store.get(&id).unwrap().reminder.is_none());

        let mut with_reminder = concert(Duration::days(2));
        with_reminder.reminder = Some(Reminder::armed(i64::MAX));
        assert!(matches!(
            store.create(with_reminder),
            Err(AgendaError::InvalidReminder(_))
        ));
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn clear_reminder_disarms() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::minutes(5))).unwrap().remove(0);
        store.toggle_reminder(&id, 10).unwrap();
        store.clear_reminder(&id).unwrap();

        assert!(store.get(&id).unwrap().reminder.is_none());
        assert!(store.mark_triggered(&id).unwrap().is_none());
    }

    #[test]
    fn mark_triggered_outside_window_is_noop() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::hours(2))).unwrap().remove(0);
        store.toggle_reminder(&id, 10).unwrap();

        assert!(store.mark_triggered(&id).unwrap().is_none());
        assert!(!store.get(&id).unwrap().reminder.unwrap().triggered);
    }

    #[test]
    fn write_failure_surfaces_but_keeps_memory() {
        let (mut store, _) = store();
        store.backend().set_fail_writes(true);

        let result = store.create(concert(Duration::days(1)));
        assert!(matches!(result, Err(AgendaError::PersistenceWrite(_))));
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn latch_holds_in_memory_when_write_fails() {
        let (mut store, _) = store();
        let id = store.create(concert(Duration::minutes(5))).unwrap().remove(0);
        store.toggle_reminder(&id, 10).unwrap();
        store.backend().set_fail_writes(true);

        let fired = store.mark_triggered(&id).unwrap();
        assert_eq!(fired.map(|e| e.id), Some(id.clone()));
        assert!(store.get(&id).unwrap().reminder.unwrap().triggered);
        assert!(store.mark_triggered(&id).unwrap().is_none());
    }

    #[test]
    fn load_prefers_event_reminder_over_stale_map() {
        let backend = MemoryStore::new();
        let mut event = concert(Duration::days(1)).into_event("a".into());
        event.reminder = Some(Reminder::armed(15));
        backend
            .set(crate::constants::EVENTS_KEY, &serde_json::to_string(&vec![event]).unwrap())
            .unwrap();
        // Left over from before the re-arm
        backend
            .set(
                crate::constants::REMINDERS_KEY,
                r#"{"a":{"enabled":true,"minutesBefore":10,"triggered":true}}"#,
            )
            .unwrap();

        let clock = Arc::new(FixedClock::new(now()));
        let store = EventStore::load(backend, clock, WeekdayNames::English);
        assert_eq!(store.events()[0].reminder, Some(Reminder::armed(15)));
    }

    #[test]
    fn load_folds_reminders_and_favorites_back() {
        let backend = MemoryStore::new();
        let event = concert(Duration::days(1)).into_event("a".into());
        backend
            .set(crate::constants::EVENTS_KEY, &serde_json::to_string(&vec![event.clone(), event]).unwrap())
            .unwrap();
        backend
            .set(
                crate::constants::REMINDERS_KEY,
                r#"{"a":{"enabled":true,"minutesBefore":10,"triggered":true}}"#,
            )
            .unwrap();
        backend.set(crate::constants::FAVORITES_KEY, r#"["a"]"#).unwrap();

        let clock = Arc::new(FixedClock::new(now()));
        let store = EventStore::load(backend, clock, WeekdayNames::English);

        assert_eq!(store.events().len(), 1);
        let loaded = &store.events()[0];
        assert!(loaded.is_favorite);
        assert!(loaded.reminder.unwrap().triggered);
    }

    #[test]
    fn load_with_corrupt_events_starts_empty() {
        let backend = MemoryStore::new();
        backend.set(crate::constants::EVENTS_KEY, "garbage").unwrap();

        let clock = Arc::new(FixedClock::new(now()));
        let store = EventStore::load(backend, clock, WeekdayNames::English);
        assert!(store.events().is_empty());
    }
}
