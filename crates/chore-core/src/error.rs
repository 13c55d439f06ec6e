use thiserror::Error;

use crate::models::ParseRecurrenceTypeError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, Name)

    #[error("Invalid recurrence type: {0}")]
    InvalidRecurrenceType(String),

    #[error("Invalid recurrence interval: {0} (must be at least 1)")]
    InvalidRecurrenceInterval(i64),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date is out of the supported range")]
    DateOutOfRange,

    #[error("Not signed in. Run `chore login <name>` first.")]
    Unauthenticated,
}

impl From<ParseRecurrenceTypeError> for CoreError {
    fn from(err: ParseRecurrenceTypeError) -> Self {
        CoreError::InvalidRecurrenceType(err.0)
    }
}
