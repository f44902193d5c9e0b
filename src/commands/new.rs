use agenda_core::clock::{WEEK, WeekdayNames};
use agenda_core::config::AgendaConfig;
use agenda_core::notify::Notifier;
use agenda_core::store::{EventStore, FileStore};
use agenda_core::{AgendaError, NewEvent, Recurrence, Reminder};
use anyhow::Result;
use chrono::NaiveDateTime;
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::Repeat;
use crate::datetime::{parse_until, parse_when};
use crate::notifier::DesktopNotifier;
use crate::render::pluralize;

pub struct NewArgs {
    pub title: Option<String>,
    pub at: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub repeat: Option<Repeat>,
    pub days: Vec<String>,
    pub until: Option<String>,
    pub count: Option<u32>,
    pub remind: Option<i64>,
}

pub fn run(args: NewArgs, store: &mut EventStore<FileStore>, config: AgendaConfig) -> Result<()> {
    let interactive = args.title.is_none() || args.at.is_none();
    let recurrence = recurrence_from(&args, config.weekday_names)?;

    if let Some(minutes) = args.remind {
        Reminder::check_lead_time(minutes)?;
    }

    // --- Title ---
    let title = match args.title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    // --- Start ---
    let datetime = match args.at {
        Some(s) => parse_when(&s)?,
        None => prompt_with_retry("  When?", parse_when)?,
    };

    let mut new = NewEvent::new(title, datetime).with_recurrence(recurrence);
    new.description = args.description.unwrap_or_default();
    new.category = args.category.unwrap_or_default();
    new.event_type = args.event_type.unwrap_or_default();
    new.location = args.location.filter(|l| !l.is_empty());
    new.reminder = args.remind.map(Reminder::armed);

    let title = new.title.clone();
    let added = match store.create(new) {
        Ok(added) => added,
        Err(AgendaError::PastDateRejected) => {
            println!(
                "{}",
                "  Nothing scheduled: the event would only occur in the past.".yellow()
            );
            return Ok(());
        }
        Err(AgendaError::DuplicateRejected) => {
            println!(
                "{}",
                format!("  Nothing scheduled: \"{}\" already exists at that time.", title).yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if interactive {
        println!();
    }
    println!(
        "{}",
        format!(
            "  Created: {} ({} {})",
            title,
            added.len(),
            pluralize("occurrence", added.len())
        )
        .green()
    );

    if args.remind.is_some() {
        DesktopNotifier::new(config).request_permission();
    }

    Ok(())
}

/// The rule implied by --repeat, --days, --until and --count.
/// Weekdays must be named in the configured language.
fn recurrence_from(args: &NewArgs, names: WeekdayNames) -> Result<Recurrence> {
    let custom_options = !args.days.is_empty() || args.until.is_some() || args.count.is_some();

    let repeat = match (args.repeat, custom_options) {
        (Some(Repeat::Custom), _) | (None, true) => Repeat::Custom,
        (Some(other), true) => anyhow::bail!(
            "--days, --until and --count only apply to --repeat custom (got {:?})",
            other
        ),
        (Some(other), false) => other,
        (None, false) => Repeat::Once,
    };

    let days: Vec<String> = args
        .days
        .iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();

    if let Some(unknown) = days.iter().find(|d| names.parse(d).is_none()) {
        let accepted: Vec<_> = WEEK.iter().map(|day| names.name(*day)).collect();
        anyhow::bail!(
            "Unknown weekday '{}'. Use one of: {}",
            unknown,
            accepted.join(", ")
        );
    }

    Ok(match repeat {
        Repeat::Once => Recurrence::Once,
        Repeat::Daily => Recurrence::Daily,
        Repeat::Yearly => Recurrence::Yearly,
        Repeat::Custom => Recurrence::Custom {
            days_of_week: days,
            end_date: args.until.as_deref().map(parse_until).transpose()?,
            occurrences: args.count,
        },
    })
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<F>(prompt: &str, parse: F) -> Result<NaiveDateTime>
where
    F: Fn(&str) -> Result<NaiveDateTime>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> NewArgs {
        NewArgs {
            title: Some("Yoga".into()),
            at: Some("2026-03-17T18:00".into()),
            description: None,
            category: None,
            event_type: None,
            location: None,
            repeat: None,
            days: Vec::new(),
            until: None,
            count: None,
            remind: None,
        }
    }

    #[test]
    fn defaults_to_once() {
        assert_eq!(
            recurrence_from(&args(), WeekdayNames::English).unwrap(),
            Recurrence::Once
        );
    }

    #[test]
    fn days_imply_custom() {
        let mut a = args();
        a.days = vec!["tuesday".into(), " thursday".into()];
        a.until = Some("2026-04-30".into());

        match recurrence_from(&a, WeekdayNames::English).unwrap() {
            Recurrence::Custom {
                days_of_week,
                end_date,
                occurrences,
            } => {
                assert_eq!(days_of_week, vec!["tuesday", "thursday"]);
                assert_eq!(end_date.unwrap().to_string(), "2026-04-30 23:59:59");
                assert_eq!(occurrences, None);
            }
            other => panic!("expected custom rule, got {:?}", other),
        }
    }

    #[test]
    fn custom_options_conflict_with_daily() {
        let mut a = args();
        a.repeat = Some(Repeat::Daily);
        a.count = Some(3);
        assert!(recurrence_from(&a, WeekdayNames::English).is_err());
    }

    #[test]
    fn unknown_or_wrong_language_day_is_refused() {
        let mut a = args();
        a.days = vec!["Munday".into()];
        let err = recurrence_from(&a, WeekdayNames::English).unwrap_err();
        assert!(err.to_string().contains("Unknown weekday 'Munday'"));
        assert!(err.to_string().contains("Monday, Tuesday"));

        a.days = vec!["tuesday".into()];
        assert!(recurrence_from(&a, WeekdayNames::Spanish).is_err());

        a.days = vec!["martes".into()];
        assert!(recurrence_from(&a, WeekdayNames::Spanish).is_ok());
    }
}
