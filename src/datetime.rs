//! Parsing of user-supplied dates and times.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse when an event starts: ISO (`2026-03-20T15:00`, `2026-03-20`)
/// or natural language ("friday 7pm", "tomorrow at 9").
/// A bare date means midnight.
pub fn parse_when(input: &str) -> Result<NaiveDateTime> {
    parse_with_default_time(input, NaiveTime::MIN)
}

/// Parse the last day of a custom recurrence. A bare date covers the whole day.
pub fn parse_until(input: &str) -> Result<NaiveDateTime> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).context("invalid end of day")?;
    parse_with_default_time(input, end_of_day)
}

fn parse_with_default_time(input: &str, default_time: NaiveTime) -> Result<NaiveDateTime> {
    let trimmed = input.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(default_time));
    }

    let expanded = expand_abbreviations(trimmed);
    fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))
}

/// Expand day and month abbreviations fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| *full)
                .unwrap_or(word)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
