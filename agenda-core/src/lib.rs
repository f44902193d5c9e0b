//! Core of agenda: recurring event scheduling and reminders.
//!
//! - `recurrence` expands a base event into concrete occurrences
//! - `merge` rejects duplicates and keeps the set pruned and ordered
//! - `store` owns the canonical collection and persists it
//! - `reminder` periodically fires due reminders exactly once
//! - `filter` derives read-only views for display

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod filter;
pub mod merge;
pub mod notify;
pub mod recurrence;
pub mod reminder;
pub mod store;

// Re-export the common types at crate root for convenience
pub use error::{AgendaError, AgendaResult};
pub use event::{CostType, Event, EventDetails, NewEvent, Recurrence, Reminder};
