use thiserror::Error;

pub type ReminderResult<T> = Result<T, ReminderError>;

/// Error type that captures reminder planning and configuration failures.
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The calendar engine could not resolve a date or its sunrise/sunset.
    #[error("Calendar lookup failed: {0}")]
    CalendarLookup(String),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

/// Failures reported by a platform notification service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification service unavailable: {0}")]
    Unavailable(String),
    #[error("notification `{id}` rejected: {reason}")]
    Rejected { id: String, reason: String },
}
