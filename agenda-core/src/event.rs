//! Event types.
//!
//! An `Event` is one concrete occurrence: it has its own id and its own
//! datetime. A `NewEvent` is the user-authored template it was generated
//! from, before any id is assigned.
//!
//! All datetimes are naive local timestamps.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_REMINDER_MINUTES;
use crate::error::{AgendaError, AgendaResult};

/// Format used when an occurrence's datetime is shown or matched as text.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A scheduled occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub details: EventDetails,
    pub datetime: NaiveDateTime,

    /// Rule this occurrence was generated from. Descriptive only; it is
    /// never re-evaluated once the occurrence exists.
    #[serde(default)]
    pub recurrence: Recurrence,

    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Reminder>,
}

/// An event as submitted by the user, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub details: EventDetails,
    pub datetime: NaiveDateTime,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Reminder>,
}

/// Organizer-facing fields carried through unchanged. Nothing in the
/// scheduling logic reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_type: Option<CostType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_amount: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostType {
    Free,
    Paid,
}

/// How a base event repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    Once,
    Daily,
    Yearly,
    /// Selected weekdays, from the base date until `end_date`.
    #[serde(rename_all = "camelCase")]
    Custom {
        #[serde(default)]
        days_of_week: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_date: Option<NaiveDateTime>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        occurrences: Option<u32>,
    },
}

/// Reminder settings for one occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub enabled: bool,
    /// Minutes before the occurrence to fire
    pub minutes_before: i64,
    /// One-shot latch. Once set it stays set until the reminder is re-armed.
    #[serde(default)]
    pub triggered: bool,
}

impl Reminder {
    /// A freshly enabled reminder that has not fired yet.
    pub fn armed(minutes_before: i64) -> Self {
        Reminder {
            enabled: true,
            minutes_before,
            triggered: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.enabled && !self.triggered
    }

    /// Reject lead times that are negative or longer than a year.
    pub fn check_lead_time(minutes_before: i64) -> AgendaResult<i64> {
        if (0..=MAX_REMINDER_MINUTES).contains(&minutes_before) {
            Ok(minutes_before)
        } else {
            Err(AgendaError::InvalidReminder(minutes_before))
        }
    }

    /// The moment this reminder becomes due for an occurrence at `datetime`,
    /// or `None` when that moment is not representable.
    pub fn fires_at(&self, datetime: NaiveDateTime) -> Option<NaiveDateTime> {
        Duration::try_minutes(self.minutes_before).and_then(|lead| datetime.checked_sub_signed(lead))
    }

    /// Armed, and `now` lies in `[fires_at, datetime)`.
    pub fn is_due(&self, datetime: NaiveDateTime, now: NaiveDateTime) -> bool {
        self.is_armed()
            && now < datetime
            && self.fires_at(datetime).is_some_and(|at| at <= now)
    }
}

impl Event {
    /// Two occurrences collide when they share an id, or a title at the same moment.
    pub fn collides_with(&self, other: &Event) -> bool {
        self.id == other.id || (self.title == other.title && self.datetime == other.datetime)
    }

    pub fn iso_datetime(&self) -> String {
        self.datetime.format(ISO_FORMAT).to_string()
    }
}

impl NewEvent {
    pub fn new(title: impl Into<String>, datetime: NaiveDateTime) -> Self {
        NewEvent {
            title: title.into(),
            description: String::new(),
            category: String::new(),
            event_type: String::new(),
            location: None,
            details: EventDetails::default(),
            datetime,
            recurrence: Recurrence::Once,
            is_favorite: false,
            reminder: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Attach an id, turning the submission into a base event.
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            event_type: self.event_type,
            location: self.location,
            details: self.details,
            datetime: self.datetime,
            recurrence: self.recurrence,
            is_favorite: self.is_favorite,
            reminder: self.reminder,
        }
    }
}

impl Recurrence {
    pub fn label(&self) -> &'static str {
        match self {
            Recurrence::Once => "once",
            Recurrence::Daily => "daily",
            Recurrence::Yearly => "yearly",
            Recurrence::Custom { .. } => "custom",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
