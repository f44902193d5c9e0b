use agenda_core::filter::{EventFilter, group_by_day, upcoming};
use agenda_core::store::{EventStore, FileStore};
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::{Render, format_date_label};

pub fn run(store: &EventStore<FileStore>, filter: &EventFilter, limit: Option<usize>) -> Result<()> {
    let now = store.now();
    let mut events = filter.apply(store.events());
    if let Some(limit) = limit {
        events = upcoming(&events, now, limit);
    }

    if events.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return Ok(());
    }

    for (i, (date, day_events)) in group_by_day(&events).into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", format_date_label(date, now).bold());
        for event in &day_events {
            println!("{}", event.render());
        }
    }

    Ok(())
}
