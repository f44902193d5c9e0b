//! Error types for agenda.

use thiserror::Error;

/// Errors that can occur in agenda operations.
///
/// `PastDateRejected` and `DuplicateRejected` are expected outcomes of
/// scheduling rather than faults; callers render them as warnings.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Nothing to schedule: every occurrence is in the past")]
    PastDateRejected,

    #[error("These events already exist in the calendar")]
    DuplicateRejected,

    #[error("Reminder must be between 0 and {max} minutes before the event, got {0}", max = crate::constants::MAX_REMINDER_MINUTES)]
    InvalidReminder(i64),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Stored data is corrupt: {0}")]
    PersistenceCorrupt(String),

    #[error("Could not save events: {0}")]
    PersistenceWrite(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
