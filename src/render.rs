//! Terminal rendering for agenda-core types.

use agenda_core::Event;
use chrono::{NaiveDate, NaiveDateTime};
use owo_colors::OwoColorize;

/// Length of the id prefix shown in listings (also accepted as input)
pub const SHORT_ID_LEN: usize = 8;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!("{:>7} {}", self.datetime.format("%H:%M"), self.title);

        if !self.category.is_empty() {
            line.push_str(&format!(" {}", format!("[{}]", self.category).dimmed()));
        }
        if self.is_favorite {
            line.push_str(&format!(" {}", "★".yellow()));
        }
        if let Some(reminder) = self.reminder.filter(|r| r.enabled) {
            let label = format!("⏰{}m", reminder.minutes_before);
            if reminder.triggered {
                line.push_str(&format!(" {}", label.dimmed()));
            } else {
                line.push_str(&format!(" {}", label.cyan()));
            }
        }

        format!("{}  {}", line, short_id(&self.id).dimmed())
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// "Today", "Tomorrow" or e.g. "Wed Feb 25"
pub fn format_date_label(date: NaiveDate, now: NaiveDateTime) -> String {
    match (date - now.date()).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
