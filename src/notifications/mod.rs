//! The platform notification scheduler seam.

pub mod in_memory;

pub use in_memory::InMemoryNotificationService;

use crate::errors::NotificationError;
use crate::reminders::{ReminderId, ReminderInstance};

/// What a cancellation found on the platform side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// Never scheduled, already fired, or already cancelled.
    NotFound,
}

/// Abstraction over the platform's local notification scheduler.
///
/// Implementations keep at most one pending notification per id: scheduling an id that is
/// already pending replaces it. Calls are expected to enqueue and return promptly.
pub trait NotificationService: Send + Sync {
    fn schedule(&self, reminder: &ReminderInstance) -> Result<(), NotificationError>;
    fn cancel(&self, id: ReminderId) -> Result<CancelOutcome, NotificationError>;
    fn cancel_all(&self) -> Result<(), NotificationError>;
}
