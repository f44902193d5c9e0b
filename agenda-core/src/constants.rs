//! Limits and fixed names shared across the crate.

/// Hard ceiling on the number of occurrences a single base event may expand to.
pub const MAX_EVENTS: usize = 100;

/// Number of daily candidates considered, starting at the base date.
pub const DAILY_SPAN: u32 = 30;

/// Number of yearly candidates considered, starting at the base date.
pub const YEARLY_SPAN: u32 = 5;

/// Horizon for custom rules without an explicit end date.
pub const CUSTOM_HORIZON_DAYS: i64 = 365;

/// Longest reminder lead time accepted: one year.
pub const MAX_REMINDER_MINUTES: i64 = 366 * 24 * 60;

/// Default period between reminder checks.
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;

// Snapshot keys in the backing key-value store
pub const EVENTS_KEY: &str = "events";
pub const REMINDERS_KEY: &str = "reminders";
pub const FAVORITES_KEY: &str = "favorites";
