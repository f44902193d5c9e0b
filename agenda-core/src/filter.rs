//! Read-only projections of the event collection for display.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Criteria combined with AND. An absent criterion matches everything.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    pub category: Option<String>,
    pub event_type: Option<String>,
    /// Prefix of the ISO datetime, e.g. `2026-03-20`
    pub date: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        let search = self.search.as_deref().filter(|s| !s.is_empty()).is_none_or(|s| {
            let needle = s.to_lowercase();
            event.title.to_lowercase().contains(&needle)
                || event.description.to_lowercase().contains(&needle)
        });

        let category = self.category.as_deref().is_none_or(|c| event.category == c);
        let event_type = self.event_type.as_deref().is_none_or(|t| event.event_type == t);
        let date = self
            .date
            .as_deref()
            .is_none_or(|d| event.iso_datetime().starts_with(d));
        let favorite = !self.favorites_only || event.is_favorite;

        search && category && event_type && date && favorite
    }

    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// The next `limit` occurrences after `now`.
pub fn upcoming(events: &[Event], now: NaiveDateTime, limit: usize) -> Vec<Event> {
    let mut future: Vec<Event> = events.iter().filter(|e| e.datetime > now).cloned().collect();
    future.sort_by_key(|e| e.datetime);
    future.truncate(limit);
    future
}

/// Occurrences bucketed by calendar day, days ascending.
pub fn group_by_day(events: &[Event]) -> Vec<(NaiveDate, Vec<Event>)> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.datetime);

    let mut days: Vec<(NaiveDate, Vec<Event>)> = Vec::new();
    for event in sorted {
        let day = event.datetime.date();
        match days.last_mut() {
            Some((current, bucket)) if *current == day => bucket.push(event),
            _ => days.push((day, vec![event])),
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NewEvent;
    use chrono::Duration;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn events() -> Vec<Event> {
        let mut play = NewEvent::new("Hamlet", at(20, 19));
        play.description = "A tragedy in five acts".into();
        play.category = "Theatre".into();
        play.event_type = "performance".into();

        let mut gig = NewEvent::new("Jazz Night", at(21, 21));
        gig.category = "Music".into();
        gig.event_type = "performance".into();
        gig.is_favorite = true;

        let mut class = NewEvent::new("Pottery", at(20, 10));
        class.category = "Workshop".into();
        class.event_type = "class".into();

        vec![
            play.into_event("play".into()),
            gig.into_event("gig".into()),
            class.into_event("class".into()),
        ]
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_matches_all() {
        assert_eq!(EventFilter::default().apply(&events()).len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let by_title = EventFilter {
            search: Some("JAZZ".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_title.apply(&events())), vec!["gig"]);

        let by_description = EventFilter {
            search: Some("tragedy".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_description.apply(&events())), vec!["play"]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let filter = EventFilter {
            event_type: Some("performance".into()),
            date: Some("2026-03-20".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&events())), vec!["play"]);

        let none = EventFilter {
            category: Some("Music".into()),
            date: Some("2026-03-20".into()),
            ..Default::default()
        };
        assert!(none.apply(&events()).is_empty());
    }

    #[test]
    fn category_is_exact() {
        let filter = EventFilter {
            category: Some("music".into()),
            ..Default::default()
        };
        assert!(filter.apply(&events()).is_empty());
    }

    #[test]
    fn favorites_only() {
        let filter = EventFilter {
            favorites_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&events())), vec!["gig"]);
    }

    #[test]
    fn upcoming_is_sorted_and_limited() {
        let next = upcoming(&events(), at(20, 12), 5);
        assert_eq!(ids(&next), vec!["play", "gig"]);

        let one = upcoming(&events(), at(20, 0), 1);
        assert_eq!(ids(&one), vec!["class"]);
        assert!(upcoming(&events(), at(21, 21) + Duration::seconds(1), 5).is_empty());
    }

    #[test]
    fn groups_by_day() {
        let days = group_by_day(&events());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].0, NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());
        assert_eq!(ids(&days[0].1), vec!["class", "play"]);
        assert_eq!(ids(&days[1].1), vec!["gig"]);
    }
}
