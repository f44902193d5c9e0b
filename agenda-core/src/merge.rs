//! Duplicate detection and merging of new occurrences into the stored set.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::{AgendaError, AgendaResult};
use crate::event::Event;

/// The stored set after a successful merge.
#[derive(Debug, Clone)]
pub struct Merged {
    /// Future occurrences, ascending by datetime
    pub events: Vec<Event>,
    /// Ids of the incoming occurrences that were accepted
    pub added: Vec<String>,
}

/// Merge `incoming` occurrences into `existing`.
///
/// An incoming occurrence is dropped if it shares an id with an existing one,
/// or the same title at the same datetime. If every incoming occurrence is
/// dropped this fails with `DuplicateRejected` and the caller keeps its state.
///
/// Survivors are appended, the set is deduplicated by id (last write wins),
/// everything at or before `now` is pruned and the rest sorted.
pub fn merge(
    existing: &[Event],
    incoming: Vec<Event>,
    now: NaiveDateTime,
) -> AgendaResult<Merged> {
    let offered = incoming.len();

    let fresh: Vec<Event> = incoming
        .into_iter()
        .filter(|new| !existing.iter().any(|old| old.collides_with(new)))
        .collect();

    if offered > 0 && fresh.is_empty() {
        return Err(AgendaError::DuplicateRejected);
    }

    let added = fresh.iter().map(|e| e.id.clone()).collect();

    let mut combined = existing.to_vec();
    combined.extend(fresh);

    Ok(Merged {
        events: prune_and_sort(dedupe_by_id(combined), now),
        added,
    })
}

/// Keep one occurrence per id. A later entry replaces an earlier one in place.
pub fn dedupe_by_id(events: Vec<Event>) -> Vec<Event> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Event> = Vec::with_capacity(events.len());

    for event in events {
        match index.get(&event.id) {
            Some(&i) => unique[i] = event,
            None => {
                index.insert(event.id.clone(), unique.len());
                unique.push(event);
            }
        }
    }

    unique
}

/// Drop occurrences at or before `now`; sort the rest ascending by datetime.
pub fn prune_and_sort(mut events: Vec<Event>, now: NaiveDateTime) -> Vec<Event> {
    events.retain(|e| e.datetime > now);
    events.sort_by_key(|e| e.datetime);
    events
}
