//! Occurrence generation for recurring events.
//!
//! Expands a base event into the concrete occurrences that still lie in the
//! future. Pure apart from fresh id assignment: no I/O, no clock reads.

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use uuid::Uuid;

use crate::clock::{WEEK, WeekdayNames};
use crate::constants::{CUSTOM_HORIZON_DAYS, DAILY_SPAN, MAX_EVENTS, YEARLY_SPAN};
use crate::event::{Event, Recurrence};

/// Expand `base` into its future occurrences, in ascending order.
///
/// - `Once` keeps the base event (and its id) if it is after `now`.
/// - `Daily` and `Yearly` consider a fixed number of candidates from the base
///   date and keep those after `now`, each under a fresh id.
/// - `Custom` walks day by day from the base date up to the end date (default
///   one year from `now`), keeping days whose weekday is listed. With no
///   weekdays listed it behaves like `Once`; when no listed name is a
///   weekday it yields nothing.
///
/// The result never holds more than `MAX_EVENTS` occurrences.
pub fn expand_occurrences(base: &Event, now: NaiveDateTime, names: WeekdayNames) -> Vec<Event> {
    match &base.recurrence {
        Recurrence::Once => single(base, now),
        Recurrence::Daily => (0..DAILY_SPAN)
            .filter_map(|i| base.datetime.checked_add_signed(Duration::days(i64::from(i))))
            .filter(|dt| *dt > now)
            .take(MAX_EVENTS)
            .map(|dt| occurrence(base, dt))
            .collect(),
        Recurrence::Yearly => (0..YEARLY_SPAN)
            // Feb 29 lands on Feb 28 in non-leap years
            .filter_map(|i| base.datetime.checked_add_months(Months::new(12 * i)))
            .filter(|dt| *dt > now)
            .take(MAX_EVENTS)
            .map(|dt| occurrence(base, dt))
            .collect(),
        Recurrence::Custom {
            days_of_week,
            end_date,
            occurrences,
        } => {
            if days_of_week.is_empty() {
                return single(base, now);
            }
            // Unknown names (typos, another language) would never match
            if !WEEK.iter().any(|day| names.matches(*day, days_of_week)) {
                return Vec::new();
            }

            let end = end_date
                .or_else(|| now.checked_add_signed(Duration::days(CUSTOM_HORIZON_DAYS)))
                .unwrap_or(NaiveDateTime::MAX);
            let limit = occurrences
                .filter(|n| *n > 0)
                .map(|n| n as usize)
                .unwrap_or(MAX_EVENTS)
                .min(MAX_EVENTS);

            // Start on the last base-time day not after `now`; earlier days
            // can only produce past occurrences.
            let skipped = (now - base.datetime).num_days().max(0);
            let Some(mut current) = base.datetime.checked_add_signed(Duration::days(skipped)) else {
                return Vec::new();
            };

            // At least one weekday matches, so `limit` occurrences need at
            // most `limit` weeks after the first future day.
            let mut events = Vec::new();
            for _ in 0..7 * (limit + 1) {
                if events.len() >= limit || current > end {
                    break;
                }
                if current > now && names.matches(current.weekday(), days_of_week) {
                    events.push(occurrence(base, current));
                }
                match current.checked_add_signed(Duration::days(1)) {
                    Some(next) => current = next,
                    None => break,
                }
            }

            events
        }
    }
}

fn single(base: &Event, now: NaiveDateTime) -> Vec<Event> {
    if base.datetime > now {
        vec![base.clone()]
    } else {
        Vec::new()
    }
}

/// Copy of the base at a new moment, under its own id.
fn occurrence(base: &Event, datetime: NaiveDateTime) -> Event {
    Event {
        id: Uuid::new_v4().to_string(),
        datetime,
        ..base.clone()
    }
}
