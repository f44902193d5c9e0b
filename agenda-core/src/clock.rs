//! Injected time and weekday naming.
//!
//! Nothing in the core reads the host clock or locale directly; it goes
//! through a `Clock` and a `WeekdayNames` so tests can pin both.

use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The host's local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        FixedClock {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Language used for weekday names in custom recurrence rules.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayNames {
    #[default]
    English,
    Spanish,
}

/// Monday first, as the week is shown to the user.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl WeekdayNames {
    pub fn name(&self, day: Weekday) -> &'static str {
        match self {
            WeekdayNames::English => match day {
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
                Weekday::Sun => "Sunday",
            },
            WeekdayNames::Spanish => match day {
                Weekday::Mon => "Lunes",
                Weekday::Tue => "Martes",
                Weekday::Wed => "Miércoles",
                Weekday::Thu => "Jueves",
                Weekday::Fri => "Viernes",
                Weekday::Sat => "Sábado",
                Weekday::Sun => "Domingo",
            },
        }
    }

    /// The weekday called `name`, ignoring case and padding.
    pub fn parse(&self, name: &str) -> Option<Weekday> {
        let name = name.trim().to_lowercase();
        WEEK.into_iter().find(|day| self.name(*day).to_lowercase() == name)
    }

    /// Whether `day` is named anywhere in `names`.
    pub fn matches(&self, day: Weekday, names: &[String]) -> bool {
        names.iter().any(|n| self.parse(n) == Some(day))
    }
}
