use agenda_core::store::{EventStore, FileStore};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::datetime::parse_when;

/// Fields to overwrite. `None` leaves the field as it is; an empty
/// location clears it.
pub struct Changes {
    pub title: Option<String>,
    pub at: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
}

pub fn run(store: &mut EventStore<FileStore>, id: &str, changes: Changes) -> Result<()> {
    let mut event = store
        .get(id)
        .cloned()
        .with_context(|| format!("No event with id '{}'", id))?;

    if let Some(title) = changes.title {
        event.title = title;
    }
    if let Some(at) = changes.at {
        event.datetime = parse_when(&at)?;
        if event.datetime <= store.now() {
            anyhow::bail!("The new start time is in the past");
        }
    }
    if let Some(description) = changes.description {
        event.description = description;
    }
    if let Some(category) = changes.category {
        event.category = category;
    }
    if let Some(event_type) = changes.event_type {
        event.event_type = event_type;
    }
    if let Some(location) = changes.location {
        event.location = Some(location).filter(|l| !l.is_empty());
    }

    let title = event.title.clone();
    store.update(event)?;
    println!("{}", format!("  Updated: {}", title).green());

    Ok(())
}
